// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cohere Command request and response bodies.

use serde::{Deserialize, Serialize};

/// How many token likelihoods the model should return. Always `NONE` here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReturnLikelihoods {
    Generation,
    All,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohereRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling mass (top-p).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
    /// Top-k cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    pub return_likelihoods: ReturnLikelihoods,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CohereResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub generations: Vec<CohereGeneration>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CohereGeneration {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    /// `COMPLETE`, `MAX_TOKENS`, `ERROR` or `ERROR_TOXIC`.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likelihoods_serialize_uppercase() {
        let request = CohereRequest {
            prompt: "p".into(),
            max_tokens: None,
            temperature: None,
            p: Some(0.75),
            k: Some(0),
            stop_sequences: None,
            return_likelihoods: ReturnLikelihoods::default(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"prompt": "p", "p": 0.75, "k": 0, "return_likelihoods": "NONE"})
        );
    }

    #[test]
    fn response_parses_generations() {
        let response: CohereResponse = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "prompt": "echoed",
            "generations": [{"id": "g1", "text": " Sure.", "finish_reason": "COMPLETE"}]
        }))
        .unwrap();
        assert_eq!(response.generations.len(), 1);
        assert_eq!(response.generations[0].text, " Sure.");
        assert_eq!(response.generations[0].finish_reason.as_deref(), Some("COMPLETE"));
    }
}
