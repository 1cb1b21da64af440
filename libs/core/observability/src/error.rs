use thiserror::Error;

pub type SinkResult<T> = Result<T, SinkError>;

/// Errors from the search-index log sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// The log index is missing and could not be created. Fatal at startup.
    #[error("Search index '{index}' could not be initialized: {reason}")]
    IndexInit { index: String, reason: String },

    #[error("Search backend request failed: {0}")]
    Transport(String),

    #[error("Search backend returned {status}: {body}")]
    Backend { status: u16, body: String },
}

impl From<reqwest::Error> for SinkError {
    fn from(e: reqwest::Error) -> Self {
        SinkError::Transport(e.to_string())
    }
}
