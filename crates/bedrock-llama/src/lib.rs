// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meta Llama 2 adapter for Amazon Bedrock.
//!
//! Prompts are sent as-is; callers format Llama chat turns (`[INST] ... [/INST]`)
//! themselves. The model accepts no `top_k` and no stop sequences, so both
//! are dropped from the request.

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

use crate::types::{LlamaRequest, LlamaResponse};

pub const DEFAULT_MODEL_ID: &str = "meta.llama2-13b-chat-v1";

/// Llama adapter implementing [`LanguageModel`].
pub struct LlamaLlm {
    client: Arc<dyn RuntimeClient>,
    model_id: String,
    callbacks: Option<Arc<dyn CallbackHandler>>,
}

impl LlamaLlm {
    /// Creates an adapter for `region`. A blank region is rejected.
    pub fn new(region: &str, options: ModelOptions) -> Result<Self, BedrockError> {
        let region = require_region(region)?;
        let client = options.resolve_client(region)?;
        Ok(Self::from_parts(
            client,
            options.resolve_model_id(DEFAULT_MODEL_ID),
            region,
        ))
    }

    /// Creates an adapter from the `[runtime]` and `[llama]` configuration sections.
    pub fn from_config(config: &BedrockConfig) -> Result<Self, BedrockError> {
        let region = require_region(&config.runtime.region)?;
        let client = ModelOptions::new().resolve_client_from_config(&config.runtime)?;
        Ok(Self::from_parts(
            client,
            resolve_model_id(config.llama.model_id.as_deref(), DEFAULT_MODEL_ID),
            region,
        ))
    }

    fn from_parts(client: Arc<dyn RuntimeClient>, model_id: String, region: &str) -> Self {
        info!(model_id = %model_id, region, "Llama adapter initialized");
        Self {
            client,
            model_id,
            callbacks: None,
        }
    }

    pub fn with_callbacks(mut self, handler: Arc<dyn CallbackHandler>) -> Self {
        self.callbacks = Some(handler);
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn to_request(&self, prompt: &str, options: &CallOptions) -> LlamaRequest {
        if let Some(top_k) = options.top_k {
            debug!(top_k, "Llama does not accept top_k, dropping it");
        }
        if !options.stop_words.is_empty() {
            debug!(
                count = options.stop_words.len(),
                "Llama does not accept stop sequences, dropping them"
            );
        }
        LlamaRequest {
            prompt: prompt.to_string(),
            max_gen_len: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
        }
    }

    async fn complete(
        &self,
        prompts: &[String],
        options: &CallOptions,
    ) -> Result<Vec<Generation>, BedrockError> {
        let prompt = single_prompt(prompts)?;
        let request = self.to_request(prompt, options);

        let text = if let Some(handler) = &options.streaming_func {
            invoke_streaming::<_, LlamaResponse>(
                self.client.as_ref(),
                &self.model_id,
                &request,
                handler,
            )
            .await?
        } else {
            let response: LlamaResponse = invoke_json(
                self.client.as_ref(),
                &self.model_id,
                &request,
                "llama response",
            )
            .await?;
            debug!(
                prompt_tokens = ?response.prompt_token_count,
                generation_tokens = ?response.generation_token_count,
                stop_reason = ?response.stop_reason,
                "generation received"
            );
            response.generation
        };

        Ok(vec![Generation::new(text)])
    }
}

#[async_trait]
impl PluginAdapter for LlamaLlm {
    fn name(&self) -> &str {
        "llama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::LanguageModel
    }

    async fn health_check(&self) -> Result<HealthStatus, BedrockError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BedrockError> {
        Ok(())
    }
}

#[async_trait]
impl LanguageModel for LlamaLlm {
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
