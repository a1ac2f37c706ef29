// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reassembles a streamed completion from its chunks.

use bedrock_core::{BedrockError, StreamingFunc};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::{ResponseStream, ResponseStreamEvent};

/// A vendor's streamed chunk shape.
pub trait CompletionChunk: DeserializeOwned + Send {
    /// Names the chunk in decode errors, e.g. `"claude stream chunk"`.
    const STAGE: &'static str;

    /// The text fragment this chunk contributes.
    fn fragment(&self) -> &str;
}

/// Drains `stream`, passing each fragment to `handler` and returning the
/// fragments concatenated in arrival order.
///
/// Unknown events are logged and skipped. A stream error, an undecodable
/// chunk, or a handler error stops the loop and is returned as-is; no
/// partial text is returned.
pub async fn reassemble<C: CompletionChunk>(
    mut stream: ResponseStream,
    handler: &StreamingFunc,
) -> Result<String, BedrockError> {
    let mut text = String::new();
    let mut chunks = 0usize;

    while let Some(event) = stream.next().await {
        match event? {
            ResponseStreamEvent::Chunk(part) => {
                let chunk: C = serde_json::from_slice(&part.bytes)
                    .map_err(|e| BedrockError::decode(C::STAGE, e))?;
                let fragment = chunk.fragment();
                handler(fragment).map_err(|e| BedrockError::Callback {
                    message: e.to_string(),
                    source: Some(e),
                })?;
                text.push_str(fragment);
                chunks += 1;
            }
            ResponseStreamEvent::Unknown { tag } => {
                warn!(tag = %tag, "skipping unknown stream event");
            }
        }
    }

    debug!(chunks, chars = text.len(), "stream complete");
    Ok(text)
}
