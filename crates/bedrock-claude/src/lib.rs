// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude adapter for Amazon Bedrock.
//!
//! This crate implements [`LanguageModel`] for Claude's text-completion API,
//! providing both single-shot completion and streamed completion through
//! the runtime's event stream.

pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use bedrock_config::BedrockConfig;
use bedrock_core::callbacks::{CallbackHandler, notify_outcome};
use bedrock_core::error::BedrockError;
use bedrock_core::traits::{LanguageModel, PluginAdapter};
use bedrock_core::types::{AdapterType, Generation, HealthStatus};
use bedrock_core::{CallOptions, single_prompt};
use bedrock_runtime::{
    ModelOptions, RuntimeClient, invoke_json, invoke_streaming, require_region, resolve_model_id,
};
use tracing::{debug, info};

use crate::types::{ClaudeRequest, ClaudeResponse};

/// Model used when no override is configured.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-v2";

/// `max_tokens_to_sample` sent when the caller does not set a limit.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// Wraps `prompt` in the `Human:`/`Assistant:` turn envelope Claude expects.
pub fn human_assistant_prompt(prompt: &str) -> String {
    format!("\n\nHuman:{prompt}\n\nAssistant:")
}

/// Claude adapter implementing [`LanguageModel`].
///
/// Everything is resolved at construction; an instance is immutable and safe
/// to share between concurrent calls.
pub struct ClaudeLlm {
    client: Arc<dyn RuntimeClient>,
    model_id: String,
    use_human_assistant_prompt: bool,
    callbacks: Option<Arc<dyn CallbackHandler>>,
}

impl ClaudeLlm {
    /// Creates an adapter for `region`.
    ///
    /// Fails with [`BedrockError::MissingRegion`] when `region` is blank, even
    /// if a runtime client is supplied in `options`.
    pub fn new(region: &str, options: ModelOptions) -> Result<Self, BedrockError> {
        let region = require_region(region)?;
        let client = options.resolve_client(region)?;
        Ok(Self::from_parts(
            client,
            options.resolve_model_id(DEFAULT_MODEL_ID),
            options.human_assistant_prompt.unwrap_or(true),
            region,
        ))
    }

    /// Creates an adapter from the `[runtime]` and `[claude]` configuration sections.
    pub fn from_config(config: &BedrockConfig) -> Result<Self, BedrockError> {
        let region = require_region(&config.runtime.region)?;
        let client = ModelOptions::new().resolve_client_from_config(&config.runtime)?;
        Ok(Self::from_parts(
            client,
            resolve_model_id(config.claude.model_id.as_deref(), DEFAULT_MODEL_ID),
            config.claude.human_assistant_prompt,
            region,
        ))
    }

    fn from_parts(
        client: Arc<dyn RuntimeClient>,
        model_id: String,
        use_human_assistant_prompt: bool,
        region: &str,
    ) -> Self {
        info!(
            model_id = %model_id,
            region,
            human_assistant_prompt = use_human_assistant_prompt,
            "Claude adapter initialized"
        );
        Self {
            client,
            model_id,
            use_human_assistant_prompt,
            callbacks: None,
        }
    }

    /// Attaches a lifecycle observer.
    pub fn with_callbacks(mut self, handler: Arc<dyn CallbackHandler>) -> Self {
        self.callbacks = Some(handler);
        self
    }

    /// Returns the model id every call is sent to.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn to_request(&self, prompt: &str, options: &CallOptions) -> ClaudeRequest {
        let prompt = if self.use_human_assistant_prompt {
            human_assistant_prompt(prompt)
        } else {
            prompt.to_string()
        };
        ClaudeRequest {
            prompt,
            max_tokens_to_sample: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            stop_sequences: options.stop_sequences(),
        }
    }

    async fn complete(
        &self,
        prompts: &[String],
        options: &CallOptions,
    ) -> Result<Vec<Generation>, BedrockError> {
        let prompt = single_prompt(prompts)?;
        let request = self.to_request(prompt, options);

        let completion = match &options.streaming_func {
            Some(handler) => {
                debug!(model_id = %self.model_id, "streaming completion");
                invoke_streaming::<_, ClaudeResponse>(
                    self.client.as_ref(),
                    &self.model_id,
                    &request,
                    handler,
                )
                .await?
            }
            None => {
                let response: ClaudeResponse = invoke_json(
                    self.client.as_ref(),
                    &self.model_id,
                    &request,
                    "claude response",
                )
                .await?;
                debug!(stop_reason = ?response.stop_reason, "completion received");
                response.completion
            }
        };

        Ok(vec![Generation::new(completion)])
    }
}

#[async_trait]
impl PluginAdapter for ClaudeLlm {
    fn name(&self) -> &str {
        "claude"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::LanguageModel
    }

    async fn health_check(&self) -> Result<HealthStatus, BedrockError> {
        // Invoking the model would spend tokens, so construction is the check.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BedrockError> {
        debug!("Claude adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl LanguageModel for ClaudeLlm {
    async fn generate(
        &self,
        prompts: &[String],
        options: &CallOptions,
    ) -> Result<Vec<Generation>, BedrockError> {
        if let Some(handler) = &self.callbacks {
            handler.on_llm_start(prompts);
        }
        let outcome = self.complete(prompts, options).await;
        notify_outcome(self.callbacks.as_ref(), &outcome);
        outcome
    }
}
