// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle observer notified around each generation call.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::BedrockError;
use crate::types::{Generation, LlmResult};

/// Observer for generation lifecycle events.
///
/// All methods default to no-ops so implementors only override what they need.
pub trait CallbackHandler: Send + Sync {
    /// Called before the backend is contacted, with the prompts as given.
    fn on_llm_start(&self, prompts: &[String]) {
        let _ = prompts;
    }

    /// Called after a successful call with the normalized result.
    fn on_llm_end(&self, result: &LlmResult) {
        let _ = result;
    }

    /// Called when the call fails.
    fn on_llm_error(&self, error: &BedrockError) {
        let _ = error;
    }
}

/// Handler that writes lifecycle events to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCallbackHandler;

impl CallbackHandler for TracingCallbackHandler {
    fn on_llm_start(&self, prompts: &[String]) {
        info!(prompts = prompts.len(), "llm call started");
    }

    fn on_llm_end(&self, result: &LlmResult) {
        let chars: usize = result
            .generations
            .iter()
            .flatten()
            .map(|g| g.text.len())
            .sum();
        info!(
            generations = result.generations.len(),
            chars, "llm call finished"
        );
    }

    fn on_llm_error(&self, error: &BedrockError) {
        warn!(error = %error, "llm call failed");
    }
}

/// Reports the outcome of a generation call to an optional handler.
pub fn notify_outcome(
    handler: Option<&Arc<dyn CallbackHandler>>,
    outcome: &Result<Vec<Generation>, BedrockError>,
) {
    let Some(handler) = handler else {
        return;
    };
    match outcome {
        Ok(generations) => handler.on_llm_end(&LlmResult::single(generations.clone())),
        Err(e) => handler.on_llm_error(e),
    }
}
