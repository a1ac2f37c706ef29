// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::BedrockError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for turning text into fixed-length vectors.
#[async_trait]
pub trait Embedder: PluginAdapter {
    /// Embeds every text, returning one vector per input in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BedrockError>;

    /// Embeds a single query text.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, BedrockError>;
}
