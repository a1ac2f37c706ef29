// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The transport seam between model adapters and the Bedrock runtime.
//!
//! Adapters only ever talk to a [`RuntimeClient`]; the HTTP implementation
//! lives in [`crate::http`] and tests substitute scripted clients.

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use bedrock_core::BedrockError;
use bytes::Bytes;
use futures::Stream;

/// MIME type of every request and synchronous response body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A single model invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeModelInput {
    pub model_id: String,
    pub body: Bytes,
    pub content_type: String,
    pub accept: String,
}

impl InvokeModelInput {
    /// Builds a JSON invocation for `model_id`.
    pub fn new(model_id: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            model_id: model_id.into(),
            body: body.into(),
            content_type: JSON_CONTENT_TYPE.to_string(),
            accept: JSON_CONTENT_TYPE.to_string(),
        }
    }
}

/// Response of a synchronous invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeModelOutput {
    pub body: Bytes,
    pub content_type: String,
}

/// Raw model output carried by one stream chunk.
#[derive(Clone, PartialEq, Eq)]
pub struct PayloadPart {
    pub bytes: Bytes,
}

impl fmt::Debug for PayloadPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadPart")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One event of a response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStreamEvent {
    /// A fragment of model output.
    Chunk(PayloadPart),
    /// An event kind this crate does not interpret; skipped by consumers.
    Unknown { tag: String },
}

impl ResponseStreamEvent {
    /// Convenience constructor for a chunk event.
    pub fn chunk(bytes: impl Into<Bytes>) -> Self {
        Self::Chunk(PayloadPart {
            bytes: bytes.into(),
        })
    }
}

/// Ordered stream of response events. Dropping it cancels the request.
pub type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<ResponseStreamEvent, BedrockError>> + Send>>;

/// Client for the Bedrock runtime API.
///
/// Implementations must be safe to share between concurrent adapter calls.
/// Failures are reported as [`BedrockError::Transport`] and are never retried.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Invokes a model and returns its complete response body.
    async fn invoke_model(&self, input: InvokeModelInput)
    -> Result<InvokeModelOutput, BedrockError>;

    /// Invokes a model and returns its output as a stream of events.
    async fn invoke_model_with_response_stream(
        &self,
        input: InvokeModelInput,
    ) -> Result<ResponseStream, BedrockError>;
}
