// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoder for the `application/vnd.amazon.eventstream` framing used by
//! `invoke-with-response-stream`.
//!
//! Each message is laid out as:
//!
//! ```text
//! +-------------+--------------+------------+---------+---------+-------------+
//! | total len   | headers len  | prelude    | headers | payload | message     |
//! | u32 BE      | u32 BE       | CRC32 BE   |         |         | CRC32 BE    |
//! +-------------+--------------+------------+---------+---------+-------------+
//! ```
//!
//! Messages may straddle network reads, so bytes are buffered until a whole
//! frame is available. Both checksums are verified before a frame is used.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bedrock_core::BedrockError;
use bytes::{Buf, Bytes, BytesMut};
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::client::{PayloadPart, ResponseStream, ResponseStreamEvent};

/// Bytes in the prelude: total length, headers length, prelude CRC.
const PRELUDE_LEN: usize = 12;

/// Prelude plus the trailing message CRC.
const MIN_MESSAGE_LEN: usize = PRELUDE_LEN + 4;

/// Upper bound on a single message; larger prefixes mean a corrupt stream.
const MAX_MESSAGE_LEN: usize = 16 * 1024 * 1024;

const STAGE: &str = "event stream";

/// A typed header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Bool(bool),
    Byte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Bytes(Bytes),
    String(String),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Uuid([u8; 16]),
}

/// A decoded message: headers in wire order plus the raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub headers: Vec<(String, HeaderValue)>,
    pub payload: Bytes,
}

impl Message {
    /// Returns the value of a string header, if present.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|(n, v)| match v {
            HeaderValue::String(s) if n == name => Some(s.as_str()),
            _ => None,
        })
    }
}

fn decode_error(message: impl Into<String>) -> BedrockError {
    BedrockError::Decode {
        stage: STAGE.to_string(),
        message: message.into(),
        source: None,
    }
}

/// Incremental frame decoder.
#[derive(Debug, Default)]
pub struct MessageDecoder {
    buf: BytesMut,
}

impl MessageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends bytes read from the network.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Number of buffered bytes not yet consumed by a complete message.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Decodes the next complete message, or `None` if more bytes are needed.
    pub fn next_message(&mut self) -> Result<Option<Message>, BedrockError> {
        if self.buf.len() < PRELUDE_LEN {
            return Ok(None);
        }

        let mut prelude = &self.buf[..PRELUDE_LEN];
        let total_len = prelude.get_u32() as usize;
        let headers_len = prelude.get_u32() as usize;
        let prelude_crc = prelude.get_u32();

        let actual = crc32fast::hash(&self.buf[..8]);
        if actual != prelude_crc {
            return Err(decode_error(format!(
                "prelude checksum mismatch: expected {prelude_crc:#010x}, computed {actual:#010x}"
            )));
        }
        if !(MIN_MESSAGE_LEN..=MAX_MESSAGE_LEN).contains(&total_len) {
            return Err(decode_error(format!("invalid message length {total_len}")));
        }
        if headers_len > total_len - MIN_MESSAGE_LEN {
            return Err(decode_error(format!(
                "headers length {headers_len} exceeds message length {total_len}"
            )));
        }

        if self.buf.len() < total_len {
            return Ok(None);
        }

        let frame = self.buf.split_to(total_len).freeze();
        let body_end = total_len - 4;
        let message_crc = (&frame[body_end..]).get_u32();
        let actual = crc32fast::hash(&frame[..body_end]);
        if actual != message_crc {
            return Err(decode_error(format!(
                "message checksum mismatch: expected {message_crc:#010x}, computed {actual:#010x}"
            )));
        }

        let headers_end = PRELUDE_LEN + headers_len;
        let headers = parse_headers(frame.slice(PRELUDE_LEN..headers_end))?;
        let payload = frame.slice(headers_end..body_end);
        trace!(total_len, headers_len, payload_len = payload.len(), "decoded event-stream frame");

        Ok(Some(Message { headers, payload }))
    }
}

fn ensure(buf: &Bytes, needed: usize, what: &str) -> Result<(), BedrockError> {
    if buf.remaining() < needed {
        return Err(decode_error(format!(
            "truncated header {what}: need {needed} bytes, have {}",
            buf.remaining()
        )));
    }
    Ok(())
}

fn parse_headers(mut buf: Bytes) -> Result<Vec<(String, HeaderValue)>, BedrockError> {
    let mut headers = Vec::new();
    while buf.has_remaining() {
        ensure(&buf, 1, "name length")?;
        let name_len = buf.get_u8() as usize;
        ensure(&buf, name_len, "name")?;
        let name = String::from_utf8(buf.split_to(name_len).to_vec())
            .map_err(|e| decode_error(format!("header name is not UTF-8: {e}")))?;

        ensure(&buf, 1, "type")?;
        let value = match buf.get_u8() {
            0 => HeaderValue::Bool(true),
            1 => HeaderValue::Bool(false),
            2 => {
                ensure(&buf, 1, "byte value")?;
                HeaderValue::Byte(buf.get_i8())
            }
            3 => {
                ensure(&buf, 2, "short value")?;
                HeaderValue::Int16(buf.get_i16())
            }
            4 => {
                ensure(&buf, 4, "int value")?;
                HeaderValue::Int32(buf.get_i32())
            }
            5 => {
                ensure(&buf, 8, "long value")?;
                HeaderValue::Int64(buf.get_i64())
            }
            tag @ (6 | 7) => {
                ensure(&buf, 2, "value length")?;
                let len = buf.get_u16() as usize;
                ensure(&buf, len, "value")?;
                let bytes = buf.split_to(len);
                if tag == 6 {
                    HeaderValue::Bytes(bytes)
                } else {
                    let s = String::from_utf8(bytes.to_vec()).map_err(|e| {
                        decode_error(format!("header `{name}` is not UTF-8: {e}"))
                    })?;
                    HeaderValue::String(s)
                }
            }
            8 => {
                ensure(&buf, 8, "timestamp value")?;
                HeaderValue::Timestamp(buf.get_i64())
            }
            9 => {
                ensure(&buf, 16, "uuid value")?;
                let mut uuid = [0u8; 16];
                buf.copy_to_slice(&mut uuid);
                HeaderValue::Uuid(uuid)
            }
            other => {
                return Err(decode_error(format!(
                    "unknown type {other} for header `{name}`"
                )));
            }
        };
        headers.push((name, value));
    }
    Ok(headers)
}

/// Payload of a `chunk` event.
#[derive(Deserialize)]
struct ChunkPayload {
    bytes: String,
}

/// Payload of an `exception` message.
#[derive(Deserialize)]
struct ExceptionPayload {
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Maps one decoded message onto a stream event.
///
/// `exception` and `error` messages become [`BedrockError::Transport`].
pub fn message_to_event(message: Message, model_id: &str) -> Result<ResponseStreamEvent, BedrockError> {
    match message.header_str(":message-type") {
        Some("event") => match message.header_str(":event-type") {
            Some("chunk") => {
                let chunk: ChunkPayload = serde_json::from_slice(&message.payload)
                    .map_err(|e| BedrockError::decode("stream chunk envelope", e))?;
                let bytes = STANDARD.decode(chunk.bytes.as_bytes()).map_err(|e| {
                    BedrockError::Decode {
                        stage: "stream chunk envelope".to_string(),
                        message: format!("invalid base64 payload: {e}"),
                        source: Some(Box::new(e)),
                    }
                })?;
                Ok(ResponseStreamEvent::Chunk(PayloadPart {
                    bytes: Bytes::from(bytes),
                }))
            }
            Some(other) => Ok(ResponseStreamEvent::Unknown {
                tag: other.to_string(),
            }),
            None => Err(decode_error("event message without :event-type header")),
        },
        Some("exception") => {
            let kind = message
                .header_str(":exception-type")
                .unwrap_or("UnknownException")
                .to_string();
            let detail = serde_json::from_slice::<ExceptionPayload>(&message.payload)
                .ok()
                .and_then(|p| p.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&message.payload).into_owned());
            Err(BedrockError::transport(model_id, format!("{kind}: {detail}")))
        }
        Some("error") => {
            let code = message.header_str(":error-code").unwrap_or("UnknownError");
            let detail = message.header_str(":error-message").unwrap_or_default();
            Err(BedrockError::transport(model_id, format!("{code}: {detail}")))
        }
        Some(other) => Ok(ResponseStreamEvent::Unknown {
            tag: other.to_string(),
        }),
        None => Err(decode_error("message without :message-type header")),
    }
}

struct DecodeState<S> {
    body: std::pin::Pin<Box<S>>,
    decoder: MessageDecoder,
    model_id: String,
    finished: bool,
}

/// Turns a raw response body into a [`ResponseStream`].
///
/// The stream ends after the first error. A body that ends in the middle of
/// a frame yields a [`BedrockError::Decode`].
pub fn decode_stream<S, E>(body: S, model_id: impl Into<String>) -> ResponseStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let state = DecodeState {
        body: Box::pin(body),
        decoder: MessageDecoder::new(),
        model_id: model_id.into(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        if st.finished {
            return None;
        }
        loop {
            match st.decoder.next_message() {
                Ok(Some(message)) => {
                    let item = message_to_event(message, &st.model_id);
                    st.finished = item.is_err();
                    return Some((item, st));
                }
                Ok(None) => {}
                Err(e) => {
                    st.finished = true;
                    return Some((Err(e), st));
                }
            }

            match st.body.next().await {
                Some(Ok(bytes)) => {
                    debug!(bytes = bytes.len(), "received stream bytes");
                    st.decoder.push(&bytes);
                }
                Some(Err(e)) => {
                    st.finished = true;
                    let err = BedrockError::Transport {
                        model_id: st.model_id.clone(),
                        status: None,
                        message: format!("failed to read response stream: {e}"),
                        source: Some(Box::new(e)),
                    };
                    return Some((Err(err), st));
                }
                None => {
                    st.finished = true;
                    let buffered = st.decoder.buffered();
                    if buffered > 0 {
                        let err = decode_error(format!(
                            "stream ended inside a frame ({buffered} bytes buffered)"
                        ));
                        return Some((Err(err), st));
                    }
                    return None;
                }
            }
        }
    }))
}
