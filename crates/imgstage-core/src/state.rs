//! Staged-upload descriptor.

use serde::Serialize;
use std::path::PathBuf;

/// Produced by the uploader once the master file is on storage; consumed by
/// the transformer (to locate the master) and the cleaner (to delete it).
/// Created once per invocation and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct UploadState {
    /// Date-derived directory holding the master and its variants.
    pub directory: PathBuf,
    /// Full path of the staged master file.
    pub path: PathBuf,
    /// Generated random filename (no extension; variants append
    /// `.<suffix>.<output>`).
    pub filename: String,
}

impl UploadState {
    /// Output path for one variant: `directory/filename.<suffix>.<output>`.
    pub fn variant_path(&self, suffix: &str, output: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}.{}", self.filename, suffix, output))
    }
}
