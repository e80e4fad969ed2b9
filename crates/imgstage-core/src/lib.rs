//! Core types for the imgstage pipeline.
//!
//! This crate holds everything the storage and processing crates share:
//! the upload configuration model and its resolution against defaults,
//! the transform toggle types, the staged-upload descriptor, human-readable
//! size parsing, and the unified error taxonomy.

pub mod config;
pub mod error;
pub mod limits;
pub mod state;

// Re-export commonly used types
pub use config::{Background, ExtendMargins, ExtractRegion, SizeSpec, Toggle, UploadConfig};
pub use error::{AppError, ErrorCode};
pub use limits::parse_size;
pub use state::UploadState;
