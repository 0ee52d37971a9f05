use reqwest::StatusCode;
use thiserror::Error;

/// Failure modes of a single streaming synthesis call.
///
/// Every variant is terminal for the invocation: nothing is retried, and a
/// partially written output file is left on disk as-is.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The connection could not be established or dropped mid-stream.
    #[error("streaming request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned HTTP status {0}")]
    HttpStatus(StatusCode),

    /// Anything else, filesystem errors in particular.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for StreamError {
    fn from(e: std::io::Error) -> Self {
        Self::Unexpected(e.to_string())
    }
}
