// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-call generation options.

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;

/// Caller-supplied handler invoked once per streamed text fragment.
///
/// Returning an error aborts the stream; the error is surfaced to the
/// caller of `generate` as [`crate::BedrockError::Callback`].
pub type StreamingFunc = Arc<dyn Fn(&str) -> Result<(), BoxError> + Send + Sync>;

/// Sampling and streaming options for one generation call.
///
/// Unset fields are left out of the vendor request so the model's own
/// defaults apply.
#[derive(Clone, Default)]
pub struct CallOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub stop_words: Vec<String>,
    /// When set, the adapter takes the streaming path.
    pub streaming_func: Option<StreamingFunc>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_stop_words<I, S>(mut self, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = stop_words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_streaming_func<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.streaming_func = Some(Arc::new(handler));
        self
    }

    /// Returns the stop words, or `None` when the list is empty.
    pub fn stop_sequences(&self) -> Option<Vec<String>> {
        if self.stop_words.is_empty() {
            None
        } else {
            Some(self.stop_words.clone())
        }
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("stop_words", &self.stop_words)
            .field("streaming", &self.streaming_func.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_every_field() {
        let opts = CallOptions::new()
            .with_max_tokens(100)
            .with_temperature(0.5)
            .with_top_p(0.9)
            .with_top_k(40)
            .with_stop_words(["\n\nHuman:"])
            .with_streaming_func(|_| Ok(()));

        assert_eq!(opts.max_tokens, Some(100));
        assert_eq!(opts.temperature, Some(0.5));
        assert_eq!(opts.top_p, Some(0.9));
        assert_eq!(opts.top_k, Some(40));
        assert_eq!(opts.stop_sequences(), Some(vec!["\n\nHuman:".to_string()]));
        assert!(opts.streaming_func.is_some());
    }

    #[test]
    fn empty_stop_words_are_omitted() {
        assert!(CallOptions::new().stop_sequences().is_none());
    }

    #[test]
    fn debug_hides_the_handler() {
        let opts = CallOptions::new().with_streaming_func(|_| Ok(()));
        let rendered = format!("{opts:?}");
        assert!(rendered.contains("streaming: true"), "got: {rendered}");
    }
}
