// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Llama 2 request and response bodies.

use bedrock_runtime::CompletionChunk;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlamaRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_gen_len: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

/// Response body; each streamed chunk carries the same fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlamaResponse {
    pub generation: String,
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    #[serde(default)]
    pub generation_token_count: Option<u32>,
    /// `stop` or `length` on the final chunk, `null` before it.
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl CompletionChunk for LlamaResponse {
    const STAGE: &'static str = "llama stream chunk";

    fn fragment(&self) -> &str {
        &self.generation
    }
}
