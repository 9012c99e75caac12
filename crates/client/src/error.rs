use thiserror::Error;
use tracker::TrackerError;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to decode {context}: {message}")]
    Decode {
        context: &'static str,
        message: String,
    },

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("insight request denied: {0}")]
    QuotaExceeded(String),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl ClientError {
    pub(crate) fn decode(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            context,
            message: err.to_string(),
        }
    }
}
