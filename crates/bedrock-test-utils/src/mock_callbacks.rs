// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback handler that records every notification.

use std::sync::Mutex;

use bedrock_core::{BedrockError, CallbackHandler, LlmResult};

/// One recorded lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackEvent {
    Start(Vec<String>),
    End(LlmResult),
    /// The error's display text.
    Error(String),
}

/// Collects notifications in the order they fire.
#[derive(Debug, Default)]
pub struct RecordingCallbackHandler {
    events: Mutex<Vec<CallbackEvent>>,
}

impl RecordingCallbackHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    pub fn events(&self) -> Vec<CallbackEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn record(&self, event: CallbackEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl CallbackHandler for RecordingCallbackHandler {
    fn on_llm_start(&self, prompts: &[String]) {
        self.record(CallbackEvent::Start(prompts.to_vec()));
    }

    fn on_llm_end(&self, result: &LlmResult) {
        self.record(CallbackEvent::End(result.clone()));
    }

    fn on_llm_error(&self, error: &BedrockError) {
        self.record(CallbackEvent::Error(error.to_string()));
    }
}
