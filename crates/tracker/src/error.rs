use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid calendar date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("score rejected: {0}")]
    InvalidScore(String),

    #[error("usage store unavailable: {0}")]
    Store(#[from] std::io::Error),

    #[error("usage store corrupted: {0}")]
    StoreFormat(#[from] serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
