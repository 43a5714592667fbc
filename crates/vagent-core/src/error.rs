use thiserror::Error;

/// Failures surfaced from a chat turn or a directory call.
///
/// Nothing here is fatal to the process: every variant degrades to a banner
/// in the UI, and retry is always a fresh user-initiated submit. Malformed
/// stream fragments are not represented at all; they are dropped inside the
/// decoder without aborting the turn.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Non-2xx response; carries the server's `detail` message when the
    /// error body had one, otherwise a status-derived fallback.
    #[error("{message}")]
    Request { message: String },

    /// Transport-level failure issuing the request.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response stream failed mid-read.
    #[error("stream read failed: {0}")]
    Stream(String),

    /// The configured read deadline elapsed while waiting for a chunk.
    #[error("timed out waiting for the response stream")]
    Timeout,
}
