use thiserror::Error;

/// Session store error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid store path: {message}")]
    InvalidPath { message: String },
}

impl StoreError {
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }
}

/// Session store result type
pub type StoreResult<T> = Result<T, StoreError>;
