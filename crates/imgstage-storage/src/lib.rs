//! Local filesystem staging for the imgstage pipeline.
//!
//! The uploader stages one master copy per invocation under a date-derived
//! directory with a random filename; the cleaner removes exactly that file
//! once every variant has been written. Variants are written by the
//! processing crate through plain paths derived from the `UploadState`.

pub mod date_format;
pub mod error;
pub mod filename;
pub mod local;
pub mod media_type;

// Re-export commonly used types
pub use date_format::format_dir;
pub use error::{StorageError, StorageResult};
pub use filename::random_filename;
pub use local::LocalStorage;
pub use media_type::canonical_extension;
