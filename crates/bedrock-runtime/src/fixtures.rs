// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event-stream encoders for building scripted response bodies.
//!
//! The runtime only ever decodes frames. These helpers produce byte-exact
//! frames for tests and are compiled in only with the `test-utils` feature.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bedrock_core::BedrockError;
use bytes::{BufMut, Bytes, BytesMut};

use crate::eventstream::HeaderValue;

/// Prelude (12 bytes) plus the trailing message CRC.
const FRAME_OVERHEAD: usize = 16;

fn too_long(what: &str, len: usize) -> BedrockError {
    BedrockError::InvalidRequest(format!("{what} of {len} bytes does not fit in a frame"))
}

fn type_tag(value: &HeaderValue) -> u8 {
    match value {
        HeaderValue::Bool(true) => 0,
        HeaderValue::Bool(false) => 1,
        HeaderValue::Byte(_) => 2,
        HeaderValue::Int16(_) => 3,
        HeaderValue::Int32(_) => 4,
        HeaderValue::Int64(_) => 5,
        HeaderValue::Bytes(_) => 6,
        HeaderValue::String(_) => 7,
        HeaderValue::Timestamp(_) => 8,
        HeaderValue::Uuid(_) => 9,
    }
}

fn put_short_bytes(out: &mut BytesMut, value: &[u8]) -> Result<(), BedrockError> {
    let len = u16::try_from(value.len()).map_err(|_| too_long("header value", value.len()))?;
    out.put_u16(len);
    out.put_slice(value);
    Ok(())
}

/// Encodes one message with valid prelude and message checksums.
///
/// Fails when a header name exceeds 255 bytes, a header value exceeds
/// 65535 bytes, or the frame length overflows `u32`.
pub fn encode_message(
    headers: &[(&str, HeaderValue)],
    payload: &[u8],
) -> Result<Bytes, BedrockError> {
    let mut encoded = BytesMut::new();
    for (name, value) in headers {
        let name_len = u8::try_from(name.len()).map_err(|_| too_long("header name", name.len()))?;
        encoded.put_u8(name_len);
        encoded.put_slice(name.as_bytes());
        encoded.put_u8(type_tag(value));
        match value {
            HeaderValue::Bool(_) => {}
            HeaderValue::Byte(v) => encoded.put_i8(*v),
            HeaderValue::Int16(v) => encoded.put_i16(*v),
            HeaderValue::Int32(v) => encoded.put_i32(*v),
            HeaderValue::Int64(v) | HeaderValue::Timestamp(v) => encoded.put_i64(*v),
            HeaderValue::Bytes(v) => put_short_bytes(&mut encoded, v)?,
            HeaderValue::String(v) => put_short_bytes(&mut encoded, v.as_bytes())?,
            HeaderValue::Uuid(v) => encoded.put_slice(v),
        }
    }

    let total = FRAME_OVERHEAD + encoded.len() + payload.len();
    let total_len = u32::try_from(total).map_err(|_| too_long("message", total))?;
    let headers_len =
        u32::try_from(encoded.len()).map_err(|_| too_long("header block", encoded.len()))?;

    let mut frame = BytesMut::with_capacity(total);
    frame.put_u32(total_len);
    frame.put_u32(headers_len);
    let prelude_crc = crc32fast::hash(&frame[..8]);
    frame.put_u32(prelude_crc);
    frame.put_slice(&encoded);
    frame.put_slice(payload);
    let message_crc = crc32fast::hash(&frame);
    frame.put_u32(message_crc);
    Ok(frame.freeze())
}

/// Encodes a `chunk` event carrying `model_output` as its base64 payload.
pub fn encode_chunk_event(model_output: &[u8]) -> Result<Bytes, BedrockError> {
    let payload = serde_json::json!({ "bytes": STANDARD.encode(model_output) }).to_string();
    encode_message(
        &[
            (":message-type", HeaderValue::String("event".into())),
            (":event-type", HeaderValue::String("chunk".into())),
            (":content-type", HeaderValue::String("application/json".into())),
        ],
        payload.as_bytes(),
    )
}

/// Encodes an `exception` message as the runtime sends mid-stream.
pub fn encode_exception(exception_type: &str, message: &str) -> Result<Bytes, BedrockError> {
    let payload = serde_json::json!({ "message": message }).to_string();
    encode_message(
        &[
            (":message-type", HeaderValue::String("exception".into())),
            (":exception-type", HeaderValue::String(exception_type.into())),
        ],
        payload.as_bytes(),
    )
}
