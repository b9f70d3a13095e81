//! SSE decoding for the provider response stream
//!
//! The provider answers with a Server-Sent Events body where each `data:`
//! payload is a JSON event in the UI message stream shape: `text-delta`,
//! `file`, `error`, `finish`, plus the literal `[DONE]` terminator. This
//! module splits the raw byte stream into event blocks and maps the
//! payloads onto [`DeltaEvent`]s.

use bytes::{Bytes, BytesMut};
use futures::Stream;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{trace, warn};

use crate::transport::DeltaEvent;

/// Consume a raw SSE byte stream and forward decoded delta events.
///
/// This function is `async` and is intended to be run inside a
/// `tokio::spawn`. It consumes the stream until it ends, the body errors,
/// or the receiving side is dropped. Dropping the receiver is how the
/// session cancels a response: the send fails, the loop breaks, and the
/// HTTP body is dropped with it, closing the connection.
///
/// SSE field processing:
///
/// - `event: ping` and `data: [PING]` (case-insensitive) -- discarded.
/// - `data: [DONE]` and `{"type":"finish"}` -- forwarded as `Done`.
/// - Unrecognized event types (stream markers such as `start`,
///   `text-start`, step boundaries) -- skipped.
///
/// # Arguments
///
/// * `byte_stream` - The raw HTTP response body as a stream of byte chunks.
/// * `tx` - Channel to forward decoded events.
pub async fn parse_sse_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>>,
    tx: mpsc::UnboundedSender<DeltaEvent>,
) {
    use futures::StreamExt;

    // Buffer accumulates raw bytes between `\n\n` boundaries. Chunks can
    // split a multi-byte character, so decoding to text happens only on
    // complete event blocks, never per chunk.
    let mut buffer = BytesMut::new();

    tokio::pin!(byte_stream);

    'read: while let Some(chunk_result) = byte_stream.next().await {
        let chunk = match chunk_result {
            Ok(c) => c,
            Err(err) => {
                warn!("response body error: {err}");
                let _ = tx.send(DeltaEvent::Error(err.to_string()));
                return;
            }
        };

        buffer.extend_from_slice(&chunk);

        // SSE events are separated by blank lines (`\n\n`).
        while let Some(pos) = buffer.windows(2).position(|w| w == b"\n\n") {
            let block = buffer.split_to(pos);
            let _ = buffer.split_to(2);
            let event_block = String::from_utf8_lossy(&block);
            if let Some(event) = decode_event_block(&event_block) {
                if tx.send(event).is_err() {
                    // Receiver dropped: stop reading so the connection closes.
                    break 'read;
                }
            }
        }
    }

    // Process any remaining partial event in the buffer.
    if !buffer.is_empty() {
        let event_block = String::from_utf8_lossy(&buffer);
        if let Some(event) = decode_event_block(&event_block) {
            let _ = tx.send(event);
        }
    }
}

/// Decode a single SSE event block (the text between two `\n\n` delimiters).
fn decode_event_block(event_block: &str) -> Option<DeltaEvent> {
    let mut data_lines: Vec<&str> = Vec::new();
    let mut event_type: Option<&str> = None;

    for line in event_block.lines() {
        if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.trim());
        } else if let Some(value) = line.strip_prefix("event:") {
            event_type = Some(value.trim());
        }
        // Lines starting with `:` are SSE comments; all others are ignored.
    }

    if let Some(et) = event_type {
        if et.eq_ignore_ascii_case("ping") {
            return None;
        }
    }

    // Join multi-line data values.
    let data = data_lines.join("\n");

    if data.is_empty() || data.eq_ignore_ascii_case("[ping]") {
        return None;
    }

    decode_data(&data)
}

/// Map one `data:` payload onto a delta event.
///
/// Returns `None` for stream markers the session does not fold
/// (`start`, `text-start`, `text-end`, step and reasoning markers).
pub fn decode_data(data: &str) -> Option<DeltaEvent> {
    if data == "[DONE]" {
        return Some(DeltaEvent::Done);
    }

    let value: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(err) => {
            trace!("skipping non-JSON SSE payload: {err}");
            return None;
        }
    };

    match value.get("type").and_then(Value::as_str) {
        Some("text-delta") => {
            let delta = value.get("delta").and_then(Value::as_str)?;
            Some(DeltaEvent::TextDelta(delta.to_string()))
        }
        Some("file") => {
            let url = value.get("url").and_then(Value::as_str)?.to_string();
            let media_type = value
                .get("mediaType")
                .and_then(Value::as_str)
                .unwrap_or("application/octet-stream")
                .to_string();
            let filename = value
                .get("filename")
                .and_then(Value::as_str)
                .map(ToString::to_string)
                .unwrap_or_else(|| filename_from_url(&url));
            Some(DeltaEvent::File {
                url,
                filename,
                media_type,
            })
        }
        Some("error") => {
            let text = value
                .get("errorText")
                .and_then(Value::as_str)
                .unwrap_or("provider stream error")
                .to_string();
            Some(DeltaEvent::Error(text))
        }
        Some("finish") => Some(DeltaEvent::Done),
        Some(other) => {
            trace!("skipping stream marker: {other}");
            None
        }
        None => None,
    }
}

fn filename_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .unwrap_or("file")
        .to_string()
}
