//! Unified error taxonomy for the pipeline.
//!
//! Every stage surfaces its first error immediately; nothing retries and
//! nothing attempts partial recovery. Each variant carries enough to build
//! the caller-facing error object: a message, a machine-readable code and,
//! where it applies, the offending field (e.g. the rejected extension).

use thiserror::Error;

/// Machine-readable error codes delivered to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    FileTypeUnsupported,
    SizeLimitExceeded,
    TooManyFiles,
    MissingFile,
    InvalidConfig,
    StorageIo,
    TransformFailed,
    CleanupFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FileTypeUnsupported => "FILE_TYPE_UNSUPPORTED",
            ErrorCode::SizeLimitExceeded => "SIZE_LIMIT_EXCEEDED",
            ErrorCode::TooManyFiles => "TOO_MANY_FILES",
            ErrorCode::MissingFile => "MISSING_FILE",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::StorageIo => "STORAGE_IO",
            ErrorCode::TransformFailed => "TRANSFORM_FAILED",
            ErrorCode::CleanupFailed => "CLEANUP_FAILED",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFileType { extension: String },

    #[error("File exceeds the configured size limit of {limit_bytes} bytes")]
    FileTooLarge { limit_bytes: u64 },

    #[error("More than one file attached to field {field:?}")]
    TooManyFiles { field: String },

    #[error("No file attached to field {field:?}")]
    MissingFile { field: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Cleanup failed: {0}")]
    Cleanup(String),
}

impl AppError {
    /// Machine-readable code for the caller-facing error object.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::UnsupportedFileType { .. } => ErrorCode::FileTypeUnsupported,
            AppError::FileTooLarge { .. } => ErrorCode::SizeLimitExceeded,
            AppError::TooManyFiles { .. } => ErrorCode::TooManyFiles,
            AppError::MissingFile { .. } => ErrorCode::MissingFile,
            AppError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            AppError::Storage(_) => ErrorCode::StorageIo,
            AppError::Transform(_) => ErrorCode::TransformFailed,
            AppError::Cleanup(_) => ErrorCode::CleanupFailed,
        }
    }

    /// The input field the error relates to, when one exists.
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::UnsupportedFileType { extension } => Some(extension),
            AppError::TooManyFiles { field } | AppError::MissingFile { field } => Some(field),
            _ => None,
        }
    }

    /// HTTP status the API boundary maps this error to.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::UnsupportedFileType { .. } => 415,
            AppError::FileTooLarge { .. } => 413,
            AppError::TooManyFiles { .. } | AppError::MissingFile { .. } => 400,
            AppError::InvalidConfig(_) => 400,
            AppError::Storage(_) | AppError::Transform(_) | AppError::Cleanup(_) => 500,
        }
    }

    /// Whether this is a bad-input failure (as opposed to an internal
    /// processing failure).
    pub fn is_client_error(&self) -> bool {
        self.http_status_code() < 500
    }
}
