// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction-time options shared by the generation adapters.

use std::fmt;
use std::sync::Arc;

use bedrock_config::model::RuntimeConfig;
use bedrock_core::BedrockError;

use crate::client::RuntimeClient;
use crate::http::HttpRuntimeClient;

/// Options applied once when an adapter is built.
///
/// Every field is optional; unset fields fall back to the adapter's defaults.
#[derive(Clone, Default)]
pub struct ModelOptions {
    /// Pre-built runtime client. `None` builds an HTTP client for the region.
    pub client: Option<Arc<dyn RuntimeClient>>,
    /// Model id override. Empty strings are ignored.
    pub model_id: Option<String>,
    /// Whether to apply a vendor's prompt envelope (Claude only).
    pub human_assistant_prompt: Option<bool>,
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runtime_client(mut self, client: Arc<dyn RuntimeClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Sends prompts verbatim instead of wrapping them in the vendor envelope.
    pub fn without_human_assistant_prompt(mut self) -> Self {
        self.human_assistant_prompt = Some(false);
        self
    }

    /// The configured model id, or `default` when unset or empty.
    pub fn resolve_model_id(&self, default: &str) -> String {
        resolve_model_id(self.model_id.as_deref(), default)
    }

    /// The configured client, or a new HTTP client for `region`.
    pub fn resolve_client(&self, region: &str) -> Result<Arc<dyn RuntimeClient>, BedrockError> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => Ok(Arc::new(HttpRuntimeClient::new(region)?)),
        }
    }

    /// The configured client, or a new HTTP client built from `config`.
    pub fn resolve_client_from_config(
        &self,
        config: &RuntimeConfig,
    ) -> Result<Arc<dyn RuntimeClient>, BedrockError> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => Ok(Arc::new(HttpRuntimeClient::from_config(config)?)),
        }
    }
}

impl fmt::Debug for ModelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelOptions")
            .field("client", &self.client.as_ref().map(|_| "custom"))
            .field("model_id", &self.model_id)
            .field("human_assistant_prompt", &self.human_assistant_prompt)
            .finish()
    }
}

/// Returns `model_id` unless it is unset or blank, else `default`.
pub fn resolve_model_id(model_id: Option<&str>, default: &str) -> String {
    model_id
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Rejects an empty or whitespace-only region with [`BedrockError::MissingRegion`].
pub fn require_region(region: &str) -> Result<&str, BedrockError> {
    let region = region.trim();
    if region.is_empty() {
        return Err(BedrockError::MissingRegion);
    }
    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_region_is_missing_region() {
        assert!(matches!(require_region(""), Err(BedrockError::MissingRegion)));
        assert!(matches!(require_region("  "), Err(BedrockError::MissingRegion)));
        assert_eq!(require_region(" us-east-1 ").unwrap(), "us-east-1");
    }

    #[test]
    fn model_override_wins_unless_blank() {
        let opts = ModelOptions::new().with_model("meta.llama2-70b-chat-v1");
        assert_eq!(
            opts.resolve_model_id("meta.llama2-13b-chat-v1"),
            "meta.llama2-70b-chat-v1"
        );

        let blank = ModelOptions::new().with_model("");
        assert_eq!(
            blank.resolve_model_id("meta.llama2-13b-chat-v1"),
            "meta.llama2-13b-chat-v1"
        );
        assert_eq!(
            ModelOptions::new().resolve_model_id("anthropic.claude-v2"),
            "anthropic.claude-v2"
        );
    }

    #[test]
    fn prompt_envelope_flag() {
        assert_eq!(ModelOptions::new().human_assistant_prompt, None);
        assert_eq!(
            ModelOptions::new()
                .without_human_assistant_prompt()
                .human_assistant_prompt,
            Some(false)
        );
    }

    #[test]
    fn default_client_is_http() {
        let client = ModelOptions::new().resolve_client("us-east-1");
        assert!(client.is_ok());
    }
}
