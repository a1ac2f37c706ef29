// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport layer for the Bedrock model adapters.
//!
//! Defines the [`RuntimeClient`] seam, a reqwest implementation for the
//! runtime's HTTP API, the event-stream frame decoder behind
//! `invoke-with-response-stream`, and the reassembly loop that turns a
//! chunk stream back into one completion.

pub mod client;
pub mod eventstream;
#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;
pub mod http;
pub mod invoke;
pub mod options;
pub mod reassembly;

pub use client::{
    InvokeModelInput, InvokeModelOutput, PayloadPart, ResponseStream, ResponseStreamEvent,
    RuntimeClient,
};
pub use http::HttpRuntimeClient;
pub use invoke::{invoke_json, invoke_streaming};
pub use options::{ModelOptions, require_region, resolve_model_id};
pub use reassembly::{CompletionChunk, reassemble};
