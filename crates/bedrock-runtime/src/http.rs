// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Bedrock runtime API.
//!
//! Provides [`HttpRuntimeClient`], which handles endpoint resolution,
//! bearer-token authentication, and error classification. Requests are
//! sent once; failures are returned to the caller without retry.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bedrock_config::model::RuntimeConfig;
use bedrock_core::BedrockError;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{InvokeModelInput, InvokeModelOutput, ResponseStream, RuntimeClient};
use crate::eventstream;

/// Environment variable holding a Bedrock API key.
pub const BEARER_TOKEN_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// MIME type of `invoke-with-response-stream` responses.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "application/vnd.amazon.eventstream";

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Returns the public runtime endpoint for `region`.
pub fn default_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

/// reqwest-backed [`RuntimeClient`].
#[derive(Clone)]
pub struct HttpRuntimeClient {
    client: reqwest::Client,
    endpoint: Url,
    bearer_token: Option<SecretString>,
    extra_headers: HeaderMap,
    /// Caps a whole synchronous invocation. Streams are bounded per read.
    timeout: Duration,
}

impl fmt::Debug for HttpRuntimeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRuntimeClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated", &self.bearer_token.is_some())
            .field("extra_headers", &self.extra_headers.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpRuntimeClient {
    /// Creates a client for the public endpoint of `region`.
    ///
    /// The bearer token is read from `AWS_BEARER_TOKEN_BEDROCK` when set.
    pub fn new(region: &str) -> Result<Self, BedrockError> {
        let bearer_token = std::env::var(BEARER_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);
        Self::build(
            &default_endpoint(region),
            bearer_token,
            HeaderMap::new(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Creates a client from the `[runtime]` configuration section.
    ///
    /// An explicit `endpoint_url` wins over the region's public endpoint, and
    /// a configured `bearer_token` wins over the environment variable.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, BedrockError> {
        let endpoint = config
            .endpoint_url
            .clone()
            .unwrap_or_else(|| default_endpoint(&config.region));
        let bearer_token = config
            .bearer_token
            .clone()
            .or_else(|| std::env::var(BEARER_TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        let mut extra_headers = HeaderMap::new();
        for (name, value) in &config.extra_headers {
            let (name, value) = parse_header(name, value)?;
            extra_headers.insert(name, value);
        }

        Self::build(
            &endpoint,
            bearer_token,
            extra_headers,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(
        endpoint: &str,
        bearer_token: Option<SecretString>,
        extra_headers: HeaderMap,
        timeout: Duration,
    ) -> Result<Self, BedrockError> {
        let endpoint = parse_endpoint(endpoint)?;
        // Per-read limits only; the whole-call deadline is set per request.
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| BedrockError::Config(format!("failed to build HTTP client: {e}")))?;

        info!(endpoint = %endpoint, authenticated = bearer_token.is_some(), "runtime client ready");
        Ok(Self {
            client,
            endpoint,
            bearer_token,
            extra_headers,
            timeout,
        })
    }

    /// Overrides the endpoint (local gateways, VPC endpoints, wiremock).
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, BedrockError> {
        self.endpoint = parse_endpoint(endpoint)?;
        Ok(self)
    }

    /// Sets the bearer token sent in the `Authorization` header.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(SecretString::from(token.into()));
        self
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, BedrockError> {
        let (name, value) = parse_header(name, value)?;
        self.extra_headers.insert(name, value);
        Ok(self)
    }

    /// Returns the endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn model_url(&self, model_id: &str, action: &str) -> Result<Url, BedrockError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| BedrockError::Config(format!("endpoint `{}` cannot have a path", self.endpoint)))?
            .pop_if_empty()
            .extend(["model", model_id, action]);
        Ok(url)
    }

    fn headers(&self, input: &InvokeModelInput, accept: &str) -> Result<HeaderMap, BedrockError> {
        let mut headers = self.extra_headers.clone();
        headers.insert(CONTENT_TYPE, header_value(&input.content_type)?);
        headers.insert(ACCEPT, header_value(accept)?);
        if let Some(token) = &self.bearer_token {
            let mut value = header_value(&format!("Bearer {}", token.expose_secret()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn send(
        &self,
        input: &InvokeModelInput,
        action: &str,
        accept: &str,
        deadline: Option<Duration>,
    ) -> Result<reqwest::Response, BedrockError> {
        let url = self.model_url(&input.model_id, action)?;
        let headers = self.headers(input, accept)?;
        debug!(model_id = %input.model_id, action, bytes = input.body.len(), "sending runtime request");

        let mut request = self
            .client
            .post(url)
            .headers(headers)
            .body(input.body.clone());
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }
        let response = request
            .send()
            .await
            .map_err(|e| BedrockError::Transport {
                model_id: input.model_id.clone(),
                status: None,
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(model_id = %input.model_id, status = %status, "runtime response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_error(&input.model_id, status.as_u16(), &body))
    }
}

#[async_trait]
impl RuntimeClient for HttpRuntimeClient {
    async fn invoke_model(
        &self,
        input: InvokeModelInput,
    ) -> Result<InvokeModelOutput, BedrockError> {
        let accept = input.accept.clone();
        let response = self
            .send(&input, "invoke", &accept, Some(self.timeout))
            .await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(crate::client::JSON_CONTENT_TYPE)
            .to_string();
        let body = response.bytes().await.map_err(|e| BedrockError::Transport {
            model_id: input.model_id.clone(),
            status: None,
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(InvokeModelOutput { body, content_type })
    }

    async fn invoke_model_with_response_stream(
        &self,
        input: InvokeModelInput,
    ) -> Result<ResponseStream, BedrockError> {
        let response = self
            .send(
                &input,
                "invoke-with-response-stream",
                EVENT_STREAM_CONTENT_TYPE,
                None,
            )
            .await?;
        Ok(eventstream::decode_stream(
            response.bytes_stream(),
            input.model_id,
        ))
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, BedrockError> {
    let url = Url::parse(endpoint)
        .map_err(|e| BedrockError::Config(format!("invalid endpoint `{endpoint}`: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(BedrockError::Config(format!(
            "endpoint `{endpoint}` cannot have a path"
        )));
    }
    Ok(url)
}

fn header_value(value: &str) -> Result<HeaderValue, BedrockError> {
    HeaderValue::from_str(value)
        .map_err(|e| BedrockError::Config(format!("invalid header value: {e}")))
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), BedrockError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| BedrockError::Config(format!("invalid header name `{name}`: {e}")))?;
    Ok((name, header_value(value)?))
}

/// Error body returned by the runtime: `{"message": "...", "__type": "..."}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(alias = "Message")]
    message: Option<String>,
    #[serde(rename = "__type")]
    error_type: Option<String>,
}

/// Builds a transport error from a non-success response.
///
/// The runtime's own message is kept verbatim; status and error type are
/// mapped to a short category so log lines are easy to scan.
pub fn classify_error(model_id: &str, status: u16, body: &str) -> BedrockError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.as_deref())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "no response body".to_string()
            } else {
                body.trim().to_string()
            }
        });
    let error_type = parsed
        .and_then(|b| b.error_type)
        .map(|t| t.rsplit('#').next().unwrap_or_default().to_ascii_lowercase())
        .unwrap_or_default();

    let category = if status == 429 || error_type.contains("throttl") {
        "throttled"
    } else if status == 401 || status == 403 || error_type.contains("accessdenied") {
        "access denied"
    } else if status == 404 || error_type.contains("notfound") {
        "model not found"
    } else if matches!(status, 400 | 413 | 415) || error_type.contains("validation") {
        "request rejected"
    } else if status == 424 || error_type.contains("modelerror") {
        "model error"
    } else {
        "service error"
    };

    BedrockError::Transport {
        model_id: model_id.to_string(),
        status: Some(status),
        message: format!("{category} ({status}): {message}"),
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::StreamExt;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::ResponseStreamEvent;
    use crate::fixtures::{encode_chunk_event, encode_exception};

    const MODEL: &str = "anthropic.claude-v2";

    fn test_client(base_url: &str) -> HttpRuntimeClient {
        HttpRuntimeClient::from_config(&RuntimeConfig {
            endpoint_url: Some(base_url.to_string()),
            bearer_token: Some("test-token".to_string()),
            ..RuntimeConfig::default()
        })
        .unwrap()
    }

    fn input() -> InvokeModelInput {
        InvokeModelInput::new(MODEL, r#"{"prompt":"hi"}"#)
    }

    #[test]
    fn default_endpoint_uses_region() {
        assert_eq!(
            default_endpoint("eu-west-3"),
            "https://bedrock-runtime.eu-west-3.amazonaws.com"
        );
    }

    #[test]
    fn model_url_appends_segments() {
        let client = test_client("http://localhost:9000/proxy/");
        let url = client.model_url(MODEL, "invoke").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/proxy/model/anthropic.claude-v2/invoke"
        );
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let err = HttpRuntimeClient::new("us-east-1")
            .unwrap()
            .with_endpoint("not a url")
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn debug_does_not_leak_the_token() {
        let client = test_client("http://localhost:9000");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("test-token"), "got: {rendered}");
    }

    #[tokio::test]
    async fn invoke_model_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/model/anthropic.claude-v2/invoke"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"prompt": "hi"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"completion": " Hello"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let output = client.invoke_model(input()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&output.body).unwrap();
        assert_eq!(body["completion"], " Hello");
        assert!(output.content_type.starts_with("application/json"));
    }

    #[tokio::test]
    async fn extra_headers_are_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("x-proxy-auth", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri())
            .with_header("x-proxy-auth", "secret")
            .unwrap();
        client.invoke_model(input()).await.unwrap();
    }

    #[tokio::test]
    async fn throttling_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "message": "Too many requests, please wait before trying again.",
                "__type": "com.amazonaws.bedrock#ThrottlingException"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.invoke_model(input()).await.unwrap_err();
        match &err {
            BedrockError::Transport {
                model_id, status, ..
            } => {
                assert_eq!(model_id, MODEL);
                assert_eq!(*status, Some(429));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        let rendered = err.to_string();
        assert!(rendered.contains("throttled (429)"), "got: {rendered}");
        assert!(rendered.contains("Too many requests"), "got: {rendered}");
    }

    #[tokio::test]
    async fn access_denied_keeps_backend_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "Message": "You don't have access to the model with the specified model ID."
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.invoke_model(input()).await.unwrap_err().to_string();
        assert!(err.contains("access denied (403)"), "got: {err}");
        assert!(err.contains("specified model ID"), "got: {err}");
    }

    #[tokio::test]
    async fn connection_failure_is_transport() {
        let client = test_client("http://127.0.0.1:1");
        let err = client.invoke_model(input()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn stream_decodes_event_frames() {
        let server = MockServer::start().await;

        let mut body = Vec::new();
        body.extend_from_slice(&encode_chunk_event(br#"{"completion":"Hel"}"#).unwrap());
        body.extend_from_slice(&encode_chunk_event(br#"{"completion":"lo"}"#).unwrap());

        Mock::given(method("POST"))
            .and(path(
                "/model/anthropic.claude-v2/invoke-with-response-stream",
            ))
            .and(header("accept", EVENT_STREAM_CONTENT_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, EVENT_STREAM_CONTENT_TYPE))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let events: Vec<_> = client
            .invoke_model_with_response_stream(input())
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &ResponseStreamEvent::chunk(&br#"{"completion":"Hel"}"#[..])
        );
    }

    #[tokio::test]
    async fn stream_exception_surfaces_as_transport_error() {
        let server = MockServer::start().await;

        let body = encode_exception("modelStreamErrorException", "model crashed").unwrap();
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.to_vec(), EVENT_STREAM_CONTENT_TYPE),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let mut stream = client
            .invoke_model_with_response_stream(input())
            .await
            .unwrap();
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("model crashed"), "got: {err}");
        assert!(stream.next().await.is_none());
    }

    fn client_with_timeout(base_url: &str, timeout_secs: u64) -> HttpRuntimeClient {
        HttpRuntimeClient::from_config(&RuntimeConfig {
            endpoint_url: Some(base_url.to_string()),
            timeout_secs,
            ..RuntimeConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn slow_invocation_hits_the_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"completion": "late"}))
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let err = client_with_timeout(&server.uri(), 1)
            .invoke_model(input())
            .await
            .unwrap_err();
        assert!(err.is_transport(), "got: {err}");
    }

    /// Serves one event-stream response, pausing `gap` between frames.
    async fn trickle_server(frames: Vec<Bytes>, gap: Duration) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Read the request head and its Content-Length body.
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_ascii_lowercase();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let body_len = text[..head_end]
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .map_or(0, |v| v.trim().parse::<usize>().unwrap());
                    if request.len() >= head_end + 4 + body_len {
                        break;
                    }
                }
                if n == 0 {
                    return;
                }
            }

            socket
                .write_all(
                    format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: {EVENT_STREAM_CONTENT_TYPE}\r\n\
                         transfer-encoding: chunked\r\nconnection: close\r\n\r\n"
                    )
                    .as_bytes(),
                )
                .await
                .unwrap();
            for (i, frame) in frames.iter().enumerate() {
                if i > 0 {
                    tokio::time::sleep(gap).await;
                }
                socket
                    .write_all(format!("{:x}\r\n", frame.len()).as_bytes())
                    .await
                    .unwrap();
                socket.write_all(frame).await.unwrap();
                socket.write_all(b"\r\n").await.unwrap();
                socket.flush().await.unwrap();
            }
            socket.write_all(b"0\r\n\r\n").await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn stream_may_outlast_the_timeout_while_bytes_keep_arriving() {
        let frames = ["a", "b", "c"]
            .iter()
            .map(|t| encode_chunk_event(format!(r#"{{"completion":"{t}"}}"#).as_bytes()).unwrap())
            .collect();
        let base = trickle_server(frames, Duration::from_millis(700)).await;

        let stream = client_with_timeout(&base, 1)
            .invoke_model_with_response_stream(input())
            .await
            .unwrap();
        let events: Vec<_> = stream.collect().await;

        assert_eq!(events.len(), 3, "got: {events:?}");
        assert!(events.iter().all(|e| e.is_ok()), "got: {events:?}");
    }

    #[test]
    fn classify_falls_back_to_raw_body() {
        let err = classify_error(MODEL, 500, "upstream exploded");
        assert_eq!(
            err.to_string(),
            "transport error (model anthropic.claude-v2): service error (500): upstream exploded"
        );
        let err = classify_error(MODEL, 404, "");
        assert!(err.to_string().contains("model not found (404): no response body"));
    }
}
