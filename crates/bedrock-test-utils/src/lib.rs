// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Bedrock model adapters.
//!
//! Provides a scripted runtime client and a recording callback handler so
//! adapter tests run without network access.
//!
//! # Components
//!
//! - [`MockRuntimeClient`] - scripted [`bedrock_runtime::RuntimeClient`] that records requests
//! - [`RecordingCallbackHandler`] - captures lifecycle notifications

pub mod mock_callbacks;
pub mod mock_runtime;

pub use mock_callbacks::{CallbackEvent, RecordingCallbackHandler};
pub use mock_runtime::{MockRuntimeClient, chunk_event};
