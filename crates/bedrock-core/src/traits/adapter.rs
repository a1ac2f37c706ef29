// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and lifecycle shared by every model adapter.

use async_trait::async_trait;

use crate::error::BedrockError;
use crate::types::{AdapterType, HealthStatus};

/// Supertrait of [`LanguageModel`](crate::LanguageModel) and [`Embedder`](crate::Embedder).
///
/// Lets a host list adapters of either kind and health-check them uniformly.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short vendor name, e.g. `claude`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Cheap liveness check; must not spend model tokens.
    async fn health_check(&self) -> Result<HealthStatus, BedrockError>;

    async fn shutdown(&self) -> Result<(), BedrockError>;
}
