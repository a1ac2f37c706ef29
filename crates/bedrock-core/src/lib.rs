// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Bedrock model adapters.
//!
//! This crate provides the trait definitions the host framework programs
//! against ([`LanguageModel`], [`Embedder`]), the shared error type, per-call
//! options, lifecycle callbacks, and the embedding batching helpers used by
//! every vendor adapter.

pub mod callbacks;
pub mod embeddings;
pub mod error;
pub mod options;
pub mod tokens;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use callbacks::{CallbackHandler, TracingCallbackHandler};
pub use error::{BedrockError, BoxError};
pub use options::{CallOptions, StreamingFunc};
pub use traits::llm::single_prompt;
pub use traits::{Embedder, LanguageModel, PluginAdapter};
pub use types::{AdapterType, Generation, HealthStatus, LlmResult, PromptValue};
