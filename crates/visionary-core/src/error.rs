use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionaryError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("note cipher error: {0}")]
    Crypto(String),

    #[error("capsule store error: {0}")]
    Store(String),

    #[error("capsule not found: {0}")]
    CapsuleNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl VisionaryError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        VisionaryError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VisionaryError>;
