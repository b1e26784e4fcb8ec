//! Incremental decoding of server-sent event streams.
//!
//! The upstream API streams completions as `data: <json>` events separated
//! by blank lines and closed by `data: [DONE]`. Each batch of complete
//! events is cleaned into JSON text and decoded with the same procedure as
//! whole bodies, so several events arriving together become one array.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;
use tracing::trace;

use oai_core::logging;
use oai_core::{Error, Result};

use crate::decode::decode_text;

/// Callback receiving decoded fragments and the bytes received so far.
///
/// Invoked synchronously, once per decoded chunk, before the next chunk is
/// read from the connection.
pub type StreamHandler<'a> = Box<dyn FnMut(Vec<Value>, usize) + Send + 'a>;

/// Stream of decoded fragment batches.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<FragmentBatch>> + Send>>;

/// Terminator event, including the blank line that precedes it.
const DONE_SENTINEL: &str = "\n\ndata: [DONE]\n\n";

/// Separator between two events in one chunk.
const EVENT_SEPARATOR: &str = "\n\ndata:";

const DATA_PREFIX: &str = "data: ";

const EVENT_END: &[u8] = b"\n\n";

/// Fragments decoded from one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentBatch {
    /// Always a sequence, even when the chunk held a single event.
    pub fragments: Vec<Value>,
    /// Cumulative body bytes received when this batch was decoded.
    pub bytes_received: usize,
}

/// Clean one chunk of event text and decode it.
///
/// Returns `Ok(None)` when nothing but the terminator (or whitespace) is
/// left after cleaning.
pub fn decode_chunk(chunk: &str) -> Result<Option<Vec<Value>>> {
    let cleaned = chunk
        .replace(DONE_SENTINEL, "")
        .replace(EVENT_SEPARATOR, ",")
        .replace(DATA_PREFIX, "");

    let trimmed = cleaned.trim();
    if trimmed.is_empty() || trimmed == "[DONE]" {
        return Ok(None);
    }

    let fragments = match decode_text(&cleaned)? {
        Value::Array(items) => items,
        single => vec![single],
    };
    Ok(Some(fragments))
}

/// Accumulates raw bytes and releases them at event boundaries.
#[derive(Debug, Default)]
struct EventFramer {
    buffer: Vec<u8>,
    bytes_received: usize,
}

impl EventFramer {
    /// Append a chunk and return every complete event buffered so far.
    fn push(&mut self, chunk: &[u8]) -> Option<String> {
        self.bytes_received += chunk.len();
        self.buffer.extend_from_slice(chunk);

        let end = self
            .buffer
            .windows(EVENT_END.len())
            .rposition(|w| w == EVENT_END)?
            + EVENT_END.len();

        let ready: Vec<u8> = self.buffer.drain(..end).collect();
        Some(String::from_utf8_lossy(&ready).into_owned())
    }

    /// Release whatever is left once the connection closes.
    fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

struct FrameState<S> {
    inner: Pin<Box<S>>,
    framer: EventFramer,
    finished: bool,
}

impl<S> FrameState<S> {
    fn batch(&self, fragments: Vec<Value>) -> FragmentBatch {
        trace!(
            { logging::FRAGMENT_COUNT } = fragments.len(),
            { logging::BYTES } = self.framer.bytes_received,
            "Decoded stream chunk"
        );
        FragmentBatch {
            fragments,
            bytes_received: self.framer.bytes_received,
        }
    }
}

/// Turn a raw byte stream into a stream of decoded fragment batches.
///
/// The stream ends after the first error.
pub fn fragment_stream<S, E>(stream: S) -> FragmentStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<Error> + Send + 'static,
{
    let state = FrameState {
        inner: Box::pin(stream),
        framer: EventFramer::default(),
        finished: false,
    };

    let batches = futures::stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        loop {
            let text = match state.inner.next().await {
                Some(Ok(chunk)) => match state.framer.push(&chunk) {
                    Some(text) => text,
                    None => continue,
                },
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(e.into()), state));
                }
                None => {
                    state.finished = true;
                    state.framer.finish()?
                }
            };

            match decode_chunk(&text) {
                Ok(Some(fragments)) => {
                    let batch = state.batch(fragments);
                    return Some((Ok(batch), state));
                }
                Ok(None) if state.finished => return None,
                Ok(None) => continue,
                Err(e) => {
                    state.finished = true;
                    return Some((Err(e), state));
                }
            }
        }
    });

    Box::pin(batches)
}

/// Drive a fragment stream to completion, handing each batch to `handler`.
pub async fn deliver(mut fragments: FragmentStream, handler: &mut StreamHandler<'_>) -> Result<()> {
    while let Some(batch) = fragments.next().await {
        let batch = batch?;
        handler(batch.fragments, batch.bytes_received);
    }
    Ok(())
}
