use thiserror::Error;

/// Per-slide generation failures. None of these abort a run.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("request timed out")]
    Timeout,

    #[error("network error - {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service reported a failed job.
    #[error("{0}")]
    Failed(String),

    #[error("no image data received")]
    NoImageData,

    #[error("stream ended before generation completed")]
    StreamEnded,

    #[error("failed to save image: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Network(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
