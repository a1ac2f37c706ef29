// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock runtime client for deterministic adapter tests.
//!
//! `MockRuntimeClient` implements `RuntimeClient` with scripted responses,
//! records every request it receives, and tracks how many requests were in
//! flight at once.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bedrock_core::BedrockError;
use bedrock_runtime::client::JSON_CONTENT_TYPE;
use bedrock_runtime::{
    InvokeModelInput, InvokeModelOutput, ResponseStream, ResponseStreamEvent, RuntimeClient,
};
use bytes::Bytes;
use futures::stream;
use tokio::sync::Mutex;

type Responder = Arc<dyn Fn(&InvokeModelInput) -> Result<Bytes, BedrockError> + Send + Sync>;

/// Builds a chunk event whose payload is `value` serialized as JSON.
pub fn chunk_event(value: serde_json::Value) -> Result<ResponseStreamEvent, BedrockError> {
    Ok(ResponseStreamEvent::chunk(value.to_string()))
}

/// A scripted runtime client.
///
/// Synchronous invocations pop from one FIFO queue and streaming
/// invocations from another. When a queue is empty the responder (if any)
/// answers, otherwise the call fails with a transport error.
#[derive(Default)]
pub struct MockRuntimeClient {
    invocations: Mutex<VecDeque<Result<Bytes, BedrockError>>>,
    streams: Mutex<VecDeque<Result<Vec<Result<ResponseStreamEvent, BedrockError>>, BedrockError>>>,
    responder: Option<Responder>,
    requests: Mutex<Vec<InvokeModelInput>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockRuntimeClient {
    /// Create a mock client with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a synchronous response body serialized from `value`.
    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.invocations
            .get_mut()
            .push_back(Ok(Bytes::from(value.to_string())));
        self
    }

    /// Queue a raw synchronous response body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.invocations.get_mut().push_back(Ok(body.into()));
        self
    }

    /// Queue a failure for the next synchronous invocation.
    pub fn with_invoke_error(mut self, error: BedrockError) -> Self {
        self.invocations.get_mut().push_back(Err(error));
        self
    }

    /// Queue a stream that yields one chunk per JSON value.
    pub fn with_stream_chunks(mut self, chunks: Vec<serde_json::Value>) -> Self {
        let events = chunks.into_iter().map(chunk_event).collect();
        self.streams.get_mut().push_back(Ok(events));
        self
    }

    /// Queue a stream of arbitrary events, including mid-stream errors.
    pub fn with_stream(mut self, events: Vec<Result<ResponseStreamEvent, BedrockError>>) -> Self {
        self.streams.get_mut().push_back(Ok(events));
        self
    }

    /// Queue a failure for the next streaming invocation, before any event.
    pub fn with_stream_error(mut self, error: BedrockError) -> Self {
        self.streams.get_mut().push_back(Err(error));
        self
    }

    /// Answer synchronous invocations with `responder` once the queue is empty.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&InvokeModelInput) -> Result<Bytes, BedrockError> + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Delay every synchronous invocation, so concurrent calls overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every request received, in arrival order.
    pub async fn requests(&self) -> Vec<InvokeModelInput> {
        self.requests.lock().await.clone()
    }

    /// Request bodies parsed as JSON, in arrival order.
    pub async fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap_or(serde_json::Value::Null))
            .collect()
    }

    /// Number of requests received.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Highest number of synchronous invocations observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn next_body(&self, input: &InvokeModelInput) -> Result<Bytes, BedrockError> {
        let scripted = self.invocations.lock().await.pop_front();
        match (scripted, &self.responder) {
            (Some(result), _) => result,
            (None, Some(responder)) => responder(input),
            (None, None) => Err(BedrockError::transport(
                &input.model_id,
                "mock runtime has no scripted response",
            )),
        }
    }
}

#[async_trait]
impl RuntimeClient for MockRuntimeClient {
    async fn invoke_model(
        &self,
        input: InvokeModelInput,
    ) -> Result<InvokeModelOutput, BedrockError> {
        self.requests.lock().await.push(input.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let result = self.next_body(&input).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        result.map(|body| InvokeModelOutput {
            body,
            content_type: JSON_CONTENT_TYPE.to_string(),
        })
    }

    async fn invoke_model_with_response_stream(
        &self,
        input: InvokeModelInput,
    ) -> Result<ResponseStream, BedrockError> {
        let model_id = input.model_id.clone();
        self.requests.lock().await.push(input);

        match self.streams.lock().await.pop_front() {
            Some(Ok(events)) => Ok(Box::pin(stream::iter(events))),
            Some(Err(e)) => Err(e),
            None => Err(BedrockError::transport(
                model_id,
                "mock runtime has no scripted stream",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn invocations_pop_in_order_then_fail() {
        let mock = MockRuntimeClient::new()
            .with_json(serde_json::json!({"n": 1}))
            .with_body("two");

        let first = mock
            .invoke_model(InvokeModelInput::new("m", "{}"))
            .await
            .unwrap();
        assert_eq!(&first.body[..], br#"{"n":1}"#);
        let second = mock
            .invoke_model(InvokeModelInput::new("m", "{}"))
            .await
            .unwrap();
        assert_eq!(&second.body[..], b"two");

        let err = mock
            .invoke_model(InvokeModelInput::new("m", "{}"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(mock.call_count().await, 3);
    }

    #[tokio::test]
    async fn responder_answers_when_queue_is_empty() {
        let mock = MockRuntimeClient::new()
            .with_responder(|input| Ok(Bytes::from(input.model_id.clone())));
        let out = mock
            .invoke_model(InvokeModelInput::new("echo-me", "{}"))
            .await
            .unwrap();
        assert_eq!(&out.body[..], b"echo-me");
    }

    #[tokio::test]
    async fn scripted_stream_yields_chunks() {
        let mock = MockRuntimeClient::new()
            .with_stream_chunks(vec![serde_json::json!({"a": 1}), serde_json::json!({"a": 2})]);
        let events: Vec<_> = mock
            .invoke_model_with_response_stream(InvokeModelInput::new("m", "{}"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.is_ok()));
    }

    #[tokio::test]
    async fn request_bodies_parse_as_json() {
        let mock = MockRuntimeClient::new().with_json(serde_json::json!({}));
        mock.invoke_model(InvokeModelInput::new("m", r#"{"prompt":"p"}"#))
            .await
            .unwrap();
        assert_eq!(
            mock.request_bodies().await,
            vec![serde_json::json!({"prompt": "p"})]
        );
    }
}
