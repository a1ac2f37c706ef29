// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction-time options for the Titan embedder.

use std::fmt;
use std::sync::Arc;

use bedrock_config::model::TitanConfig;
use bedrock_core::BedrockError;
use bedrock_runtime::RuntimeClient;

/// Options applied once when a [`TitanEmbedder`](crate::TitanEmbedder) is built.
#[derive(Clone)]
pub struct EmbedderOptions {
    pub client: Option<Arc<dyn RuntimeClient>>,
    pub model_id: Option<String>,
    /// Replace every `\n` with a space before embedding.
    pub strip_new_lines: bool,
    /// Texts per batch; `0` sends everything as one batch.
    pub batch_size: usize,
    /// Split texts longer than this many characters and combine the pieces.
    pub max_chunk_chars: Option<usize>,
    /// Requests in flight at once within a batch.
    pub max_concurrency: usize,
}

impl Default for EmbedderOptions {
    fn default() -> Self {
        Self {
            client: None,
            model_id: None,
            strip_new_lines: false,
            batch_size: 0,
            max_chunk_chars: None,
            max_concurrency: 1,
        }
    }
}

impl EmbedderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options mirroring a `[titan]` configuration section.
    pub fn from_config(config: &TitanConfig) -> Self {
        Self {
            client: None,
            model_id: config.model_id.clone(),
            strip_new_lines: config.strip_new_lines,
            batch_size: config.batch_size,
            max_chunk_chars: config.max_chunk_chars,
            max_concurrency: config.max_concurrency,
        }
    }

    pub fn with_runtime_client(mut self, client: Arc<dyn RuntimeClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_strip_new_lines(mut self, strip: bool) -> Self {
        self.strip_new_lines = strip;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_chunk_chars(mut self, max_chars: usize) -> Self {
        self.max_chunk_chars = Some(max_chars);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), BedrockError> {
        if self.max_concurrency == 0 {
            return Err(BedrockError::Config(
                "max_concurrency must be at least 1".into(),
            ));
        }
        if self.max_chunk_chars == Some(0) {
            return Err(BedrockError::Config(
                "max_chunk_chars must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for EmbedderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedderOptions")
            .field("client", &self.client.as_ref().map(|_| "custom"))
            .field("model_id", &self.model_id)
            .field("strip_new_lines", &self.strip_new_lines)
            .field("batch_size", &self.batch_size)
            .field("max_chunk_chars", &self.max_chunk_chars)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = EmbedderOptions::new();
        assert!(!options.strip_new_lines);
        assert_eq!(options.batch_size, 0);
        assert_eq!(options.max_chunk_chars, None);
        assert_eq!(options.max_concurrency, 1);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = EmbedderOptions::new()
            .with_max_concurrency(0)
            .validate()
            .unwrap_err();
        assert!(err.is_config());

        let err = EmbedderOptions::new()
            .with_max_chunk_chars(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("max_chunk_chars"));
    }

    #[test]
    fn from_config_copies_every_field() {
        let config = TitanConfig {
            model_id: Some("amazon.titan-embed-g1-text-02".into()),
            strip_new_lines: true,
            batch_size: 8,
            max_chunk_chars: Some(2000),
            max_concurrency: 4,
        };
        let options = EmbedderOptions::from_config(&config);
        assert_eq!(options.model_id.as_deref(), Some("amazon.titan-embed-g1-text-02"));
        assert!(options.strip_new_lines);
        assert_eq!(options.batch_size, 8);
        assert_eq!(options.max_chunk_chars, Some(2000));
        assert_eq!(options.max_concurrency, 4);
        assert!(options.client.is_none());
    }
}
