// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claude text-completion request and response types.

use bedrock_runtime::CompletionChunk;
use serde::{Deserialize, Serialize};

/// Body of a Claude text-completion invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaudeRequest {
    /// Prompt text, already wrapped in the `Human:`/`Assistant:` envelope if enabled.
    pub prompt: String,
    /// Maximum number of tokens to generate. Required by the model.
    pub max_tokens_to_sample: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Response body of a synchronous invocation; streamed chunks share the shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClaudeResponse {
    pub completion: String,
    /// `stop_sequence`, `max_tokens`, or absent on intermediate chunks.
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// The stop sequence that ended generation, if any.
    #[serde(default)]
    pub stop: Option<String>,
}

impl CompletionChunk for ClaudeResponse {
    const STAGE: &'static str = "claude stream chunk";

    fn fragment(&self) -> &str {
        &self.completion
    }
}
