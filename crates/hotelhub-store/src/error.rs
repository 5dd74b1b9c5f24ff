//! Store-specific error types and conversions.

use hotelhub_core::error::HotelError;

/// Backend error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Record store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl From<StoreError> for HotelError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Config(msg) => HotelError::Config(msg),
            other => HotelError::Transport(other.to_string()),
        }
    }
}
