//! Line-framed decoding of the streaming chat response.
//!
//! The wire format is line-oriented: lines beginning with `data: ` carry a
//! JSON payload with an optional `content` field, the literal `[DONE]` is a
//! no-op sentinel, and everything else is skipped. End-of-stream is the
//! transport's own EOF, not the sentinel. [`LineFramer`] decouples protocol
//! parsing from however the transport happened to chunk the bytes.

use std::time::Duration;

use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::error::ChatError;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// Accumulates transport chunks and yields complete lines.
///
/// Bytes stay buffered until a newline arrives, so a UTF-8 sequence split
/// across chunks is reassembled before decoding. CRLF endings are accepted.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns the complete lines it closed off, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // trailing '\n'
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Whatever remains after EOF: an unterminated final line, if any.
    pub fn finish(self) -> Option<String> {
        if self.buf.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.buf).into_owned())
        }
    }
}

#[derive(Deserialize)]
struct Fragment {
    content: Option<String>,
}

/// What one framed line means to the protocol.
#[derive(Debug, PartialEq)]
pub enum StreamLine {
    /// Fragment text to append to the assistant message.
    Content(String),
    /// Nothing to apply: unprefixed line, `[DONE]` sentinel, fragment
    /// without content, or malformed payload.
    Skip,
}

pub fn classify_line(line: &str) -> StreamLine {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return StreamLine::Skip;
    };
    if payload == DONE_SENTINEL {
        return StreamLine::Skip;
    }
    match serde_json::from_str::<Fragment>(payload) {
        Ok(Fragment {
            content: Some(text),
        }) => StreamLine::Content(text),
        Ok(Fragment { content: None }) => StreamLine::Skip,
        Err(err) => {
            // Malformed fragments are never fatal to the turn.
            debug!("dropping malformed stream line: {err}");
            StreamLine::Skip
        }
    }
}

/// Drive a byte-chunk stream through the framer, handing each decoded
/// fragment to `sink` in arrival order.
///
/// Returns when the transport signals end-of-stream. `deadline`, when set,
/// bounds each individual read; with `None` a stalled stream waits forever,
/// which matches the backend contract (no deadline is guaranteed).
pub async fn pump<S, B, E>(
    stream: S,
    deadline: Option<Duration>,
    mut sink: impl FnMut(String),
) -> Result<(), ChatError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    futures_util::pin_mut!(stream);
    let mut framer = LineFramer::new();

    loop {
        let next = match deadline {
            Some(limit) => match tokio::time::timeout(limit, stream.next()).await {
                Ok(item) => item,
                Err(_) => return Err(ChatError::Timeout),
            },
            None => stream.next().await,
        };

        let Some(item) = next else { break };
        let chunk = item.map_err(|err| ChatError::Stream(err.to_string()))?;
        for line in framer.push(chunk.as_ref()) {
            if let StreamLine::Content(text) = classify_line(&line) {
                sink(text);
            }
        }
    }

    // The server terminates every line, but don't drop a final unterminated
    // fragment if it ever stops doing so.
    if let Some(tail) = framer.finish() {
        if let StreamLine::Content(text) = classify_line(&tail) {
            sink(text);
        }
    }

    Ok(())
}
