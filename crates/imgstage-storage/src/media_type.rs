//! Declared media type to canonical extension mapping.
//!
//! The uploader gates on the extension implied by the multipart part's
//! declared `Content-Type`, checked against the configured accept list
//! before any byte reaches storage.

use imgstage_core::AppError;

/// Canonical file extension for a declared image media type.
pub fn canonical_extension(content_type: &str) -> Option<&'static str> {
    match content_type.to_ascii_lowercase().as_str() {
        "image/jpeg" => Some("jpeg"),
        "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/avif" => Some("avif"),
        "image/bmp" => Some("bmp"),
        "image/tiff" => Some("tiff"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

/// Check a declared media type against the accept list, returning the
/// canonical extension on success.
pub fn check_accepted(content_type: &str, accept: &[String]) -> Result<&'static str, AppError> {
    let extension = canonical_extension(content_type).ok_or_else(|| {
        AppError::UnsupportedFileType {
            extension: content_type.to_string(),
        }
    })?;

    if accept.iter().any(|a| a == extension) {
        Ok(extension)
    } else {
        Err(AppError::UnsupportedFileType {
            extension: extension.to_string(),
        })
    }
}
