// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed request/response helpers on top of [`RuntimeClient`].

use bedrock_core::{BedrockError, StreamingFunc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::client::{InvokeModelInput, RuntimeClient};
use crate::reassembly::{CompletionChunk, reassemble};

fn encode_input<Req: Serialize>(model_id: &str, request: &Req) -> Result<InvokeModelInput, BedrockError> {
    let body = serde_json::to_vec(request).map_err(BedrockError::encode)?;
    trace!(model_id, body = %String::from_utf8_lossy(&body), "request payload");
    Ok(InvokeModelInput::new(model_id, body))
}

/// Sends `request` as JSON and decodes the response body as `Resp`.
///
/// `stage` names the response shape in decode errors.
pub async fn invoke_json<Req, Resp>(
    client: &dyn RuntimeClient,
    model_id: &str,
    request: &Req,
    stage: &str,
) -> Result<Resp, BedrockError>
where
    Req: Serialize + Sync,
    Resp: DeserializeOwned,
{
    let input = encode_input(model_id, request)?;
    debug!(model_id, bytes = input.body.len(), "invoking model");

    let output = client.invoke_model(input).await?;
    debug!(model_id, bytes = output.body.len(), "model responded");

    serde_json::from_slice(&output.body).map_err(|e| BedrockError::decode(stage, e))
}

/// Sends `request` on the streaming endpoint and reassembles the chunks.
pub async fn invoke_streaming<Req, C>(
    client: &dyn RuntimeClient,
    model_id: &str,
    request: &Req,
    handler: &StreamingFunc,
) -> Result<String, BedrockError>
where
    Req: Serialize + Sync,
    C: CompletionChunk,
{
    let input = encode_input(model_id, request)?;
    debug!(model_id, bytes = input.body.len(), "invoking model with response stream");

    let stream = client.invoke_model_with_response_stream(input).await?;
    reassemble::<C>(stream, handler).await
}
