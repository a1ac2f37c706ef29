// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every Bedrock adapter.
//!
//! Each variant names the stage that failed so callers can tell a
//! configuration mistake from a backend failure from a malformed response.

use thiserror::Error;

/// Boxed error type accepted from caller-supplied callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all adapter traits and the runtime transport.
#[derive(Debug, Error)]
pub enum BedrockError {
    /// The region / endpoint locator was empty at construction time.
    #[error("empty region")]
    MissingRegion,

    /// Other construction-time configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller passed arguments the adapter cannot act on.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The vendor request body could not be serialized.
    #[error("failed to encode request: {message}")]
    Encode {
        message: String,
        source: Option<BoxError>,
    },

    /// Network, authentication, or backend rejection. Never retried.
    #[error("transport error (model {model_id}): {message}")]
    Transport {
        model_id: String,
        /// HTTP status when the backend answered at all.
        status: Option<u16>,
        message: String,
        source: Option<BoxError>,
    },

    /// A response body or stream chunk did not match the expected shape.
    #[error("failed to decode {stage}: {message}")]
    Decode {
        stage: String,
        message: String,
        source: Option<BoxError>,
    },

    /// The backend returned no generations where exactly one was expected.
    #[error("empty response")]
    EmptyResponse,

    /// The caller's streaming handler reported a failure.
    #[error("streaming handler failed: {message}")]
    Callback {
        message: String,
        source: Option<BoxError>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BedrockError {
    /// Builds a [`BedrockError::Transport`] without an HTTP status or source.
    pub fn transport(model_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            model_id: model_id.into(),
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`BedrockError::Decode`] from a serde failure at `stage`.
    pub fn decode(stage: impl Into<String>, err: serde_json::Error) -> Self {
        Self::Decode {
            stage: stage.into(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Builds a [`BedrockError::Encode`] from a serde failure.
    pub fn encode(err: serde_json::Error) -> Self {
        Self::Encode {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// True for errors caused by construction-time configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::MissingRegion | Self::Config(_))
    }

    /// True for errors raised while talking to the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// True for malformed response bodies or stream chunks.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_the_stage() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = BedrockError::decode("claude response", err);
        assert!(err.is_decode());
        assert!(err.to_string().starts_with("failed to decode claude response"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn transport_error_carries_model_id() {
        let err = BedrockError::transport("anthropic.claude-v2", "connection refused");
        assert!(err.is_transport());
        assert!(!err.is_config());
        assert_eq!(
            err.to_string(),
            "transport error (model anthropic.claude-v2): connection refused"
        );
    }

    #[test]
    fn missing_region_is_a_config_error() {
        assert!(BedrockError::MissingRegion.is_config());
        assert_eq!(BedrockError::MissingRegion.to_string(), "empty region");
        assert_eq!(BedrockError::EmptyResponse.to_string(), "empty response");
    }
}
