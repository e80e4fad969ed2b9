//! Storage operation errors.

use imgstage_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Upload exceeds size limit of {limit_bytes} bytes")]
    TooLarge { limit_bytes: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TooLarge { limit_bytes } => AppError::FileTooLarge { limit_bytes },
            other => AppError::Storage(other.to_string()),
        }
    }
}
