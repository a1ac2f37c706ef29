// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Amazon Titan text-embedding adapter for Amazon Bedrock.
//!
//! Titan embeds one text per request. [`TitanEmbedder::embed_documents`]
//! batches its input, optionally splits long texts into pieces, fans the
//! requests out with bounded concurrency, and recombines piece vectors so
//! every input text maps to exactly one vector, in input order.

pub mod options;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use bedrock_config::BedrockConfig;
use bedrock_core::embeddings::{
    batch_texts, combine_vectors, maybe_remove_newlines, remove_newlines, split_text,
};
use bedrock_core::error::BedrockError;
use bedrock_core::traits::{Embedder, PluginAdapter};
use bedrock_core::types::{AdapterType, HealthStatus};
use bedrock_runtime::{RuntimeClient, invoke_json, require_region, resolve_model_id};
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, trace};

pub use crate::options::EmbedderOptions;
use crate::types::{TitanRequest, TitanResponse};

pub const DEFAULT_MODEL_ID: &str = "amazon.titan-embed-text-v1";

/// Length of every vector produced by the default model.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Titan embedder implementing [`Embedder`].
pub struct TitanEmbedder {
    client: Arc<dyn RuntimeClient>,
    model_id: String,
    strip_new_lines: bool,
    batch_size: usize,
    max_chunk_chars: Option<usize>,
    max_concurrency: usize,
}

impl TitanEmbedder {
    /// Creates an embedder for `region`.
    ///
    /// Fails with [`BedrockError::MissingRegion`] on a blank region and with
    /// [`BedrockError::Config`] on a zero concurrency or chunk size.
    pub fn new(region: &str, options: EmbedderOptions) -> Result<Self, BedrockError> {
        let region = require_region(region)?;
        options.validate()?;
        let client: Arc<dyn RuntimeClient> = match &options.client {
            Some(client) => client.clone(),
            None => Arc::new(bedrock_runtime::HttpRuntimeClient::new(region)?),
        };
        Ok(Self::from_parts(client, options, region))
    }

    /// Creates an embedder from the `[runtime]` and `[titan]` configuration sections.
    pub fn from_config(config: &BedrockConfig) -> Result<Self, BedrockError> {
        let region = require_region(&config.runtime.region)?;
        let options = EmbedderOptions::from_config(&config.titan);
        options.validate()?;
        let client: Arc<dyn RuntimeClient> =
            Arc::new(bedrock_runtime::HttpRuntimeClient::from_config(&config.runtime)?);
        Ok(Self::from_parts(client, options, region))
    }

    fn from_parts(client: Arc<dyn RuntimeClient>, options: EmbedderOptions, region: &str) -> Self {
        let model_id = resolve_model_id(options.model_id.as_deref(), DEFAULT_MODEL_ID);
        info!(
            model_id = %model_id,
            region,
            batch_size = options.batch_size,
            max_concurrency = options.max_concurrency,
            "Titan embedder initialized"
        );
        Self {
            client,
            model_id,
            strip_new_lines: options.strip_new_lines,
            batch_size: options.batch_size,
            max_chunk_chars: options.max_chunk_chars,
            max_concurrency: options.max_concurrency,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, BedrockError> {
        let request = TitanRequest { input_text: text };
        let response: TitanResponse = invoke_json(
            self.client.as_ref(),
            &self.model_id,
            &request,
            "titan embedding response",
        )
        .await?;
        if response.embedding.is_empty() {
            return Err(BedrockError::Decode {
                stage: "titan embedding response".into(),
                message: "embedding is empty".into(),
                source: None,
            });
        }
        trace!(tokens = ?response.input_text_token_count, "text embedded");
        Ok(response.embedding)
    }

    fn pieces(&self, text: &str) -> Vec<String> {
        match self.max_chunk_chars {
            Some(max_chars) => split_text(text, max_chars),
            None => vec![text.to_string()],
        }
    }

    /// Embeds one batch, returning exactly one vector per item.
    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, BedrockError> {
        let pieces: Vec<Vec<String>> = batch.iter().map(|text| self.pieces(text)).collect();

        // Futures are built up front so the stream holds no borrowing closure;
        // `buffered` keeps output in request order.
        let requests: Vec<_> = pieces
            .iter()
            .flatten()
            .map(|piece| self.embed_text(piece))
            .collect();
        let vectors: Vec<Vec<f32>> = stream::iter(requests)
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        let mut vectors = vectors.into_iter();
        pieces
            .iter()
            .map(|item| {
                let item_vectors: Vec<Vec<f32>> = vectors.by_ref().take(item.len()).collect();
                let weights: Vec<usize> = item.iter().map(|p| p.chars().count()).collect();
                combine_vectors(&item_vectors, &weights)
            })
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for TitanEmbedder {
    fn name(&self) -> &str {
        "titan"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, BedrockError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BedrockError> {
        Ok(())
    }
}

#[async_trait]
impl Embedder for TitanEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BedrockError> {
        let texts = maybe_remove_newlines(texts, self.strip_new_lines);
        let batches = batch_texts(&texts, self.batch_size);
        debug!(texts = texts.len(), batches = batches.len(), "embedding documents");

        let mut embeddings = Vec::with_capacity(texts.len());
        for (index, batch) in batches.into_iter().enumerate() {
            debug!(batch = index, items = batch.len(), "embedding batch");
            embeddings.extend(self.embed_batch(batch).await?);
        }
        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, BedrockError> {
        if self.strip_new_lines {
            return self.embed_text(&remove_newlines(text)).await;
        }
        self.embed_text(text).await
    }
}
