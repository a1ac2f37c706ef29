// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Titan embedding request and response bodies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanRequest<'a> {
    pub input_text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanResponse {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub input_text_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let body = serde_json::to_value(TitanRequest { input_text: "hi" }).unwrap();
        assert_eq!(body, serde_json::json!({"inputText": "hi"}));

        let response: TitanResponse = serde_json::from_value(serde_json::json!({
            "embedding": [0.5, -0.25],
            "inputTextTokenCount": 2
        }))
        .unwrap();
        assert_eq!(response.embedding, vec![0.5, -0.25]);
        assert_eq!(response.input_text_token_count, Some(2));
    }
}
