use slide_common::ConfigError;
use thiserror::Error;

/// Run-level errors. Per-slide generation failures never surface here.
#[derive(Error, Debug)]
pub enum SlideError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid slide plan: {0}")]
    InvalidPlan(String),
}

pub type Result<T> = std::result::Result<T, SlideError>;
