// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cohere Command adapter for Amazon Bedrock.
//!
//! Cohere is only invoked synchronously. A streaming handler still works:
//! it receives the whole completion as a single chunk, so both paths
//! return the same text.

pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use bedrock_config::BedrockConfig;
use bedrock_core::callbacks::{CallbackHandler, notify_outcome};
use bedrock_core::error::BedrockError;
use bedrock_core::traits::{LanguageModel, PluginAdapter};
use bedrock_core::types::{AdapterType, Generation, HealthStatus};
use bedrock_core::{CallOptions, single_prompt};
use bedrock_runtime::{ModelOptions, RuntimeClient, invoke_json, require_region, resolve_model_id};
use tracing::{debug, info};

use crate::types::{CohereRequest, CohereResponse, ReturnLikelihoods};

pub const DEFAULT_MODEL_ID: &str = "cohere.command-text-v14";

/// Cohere Command adapter implementing [`LanguageModel`].
pub struct CohereLlm {
    client: Arc<dyn RuntimeClient>,
    model_id: String,
    callbacks: Option<Arc<dyn CallbackHandler>>,
}

impl CohereLlm {
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

    /// Creates an adapter from the `[runtime]` and `[cohere]` configuration sections.
    pub fn from_config(config: &BedrockConfig) -> Result<Self, BedrockError> {
        let region = require_region(&config.runtime.region)?;
        let client = ModelOptions::new().resolve_client_from_config(&config.runtime)?;
        Ok(Self::from_parts(
            client,
            resolve_model_id(config.cohere.model_id.as_deref(), DEFAULT_MODEL_ID),
            region,
        ))
    }

    fn from_parts(client: Arc<dyn RuntimeClient>, model_id: String, region: &str) -> Self {
        info!(model_id = %model_id, region, "Cohere adapter initialized");
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

    fn to_request(prompt: &str, options: &CallOptions) -> CohereRequest {
        CohereRequest {
            prompt: prompt.to_string(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            p: options.top_p,
            k: options.top_k,
            stop_sequences: options.stop_sequences(),
            return_likelihoods: ReturnLikelihoods::None,
        }
    }

    async fn complete(
        &self,
        prompts: &[String],
        options: &CallOptions,
    ) -> Result<Vec<Generation>, BedrockError> {
        let prompt = single_prompt(prompts)?;
        let request = Self::to_request(prompt, options);

        let response: CohereResponse = invoke_json(
            self.client.as_ref(),
            &self.model_id,
            &request,
            "cohere response",
        )
        .await?;

        let first = response
            .generations
            .into_iter()
            .next()
            .ok_or(BedrockError::EmptyResponse)?;
        debug!(finish_reason = ?first.finish_reason, "generation received");

        if let Some(handler) = &options.streaming_func {
            handler(&first.text).map_err(|e| BedrockError::Callback {
                message: e.to_string(),
                source: Some(e),
            })?;
        }

        Ok(vec![Generation::new(first.text)])
    }
}

#[async_trait]
impl PluginAdapter for CohereLlm {
    fn name(&self) -> &str {
        "cohere"
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
impl LanguageModel for CohereLlm {
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
