//! Local filesystem staging backend.

use std::path::{Path, PathBuf};

use chrono::Local;
use imgstage_core::UploadState;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::date_format::format_dir;
use crate::error::{StorageError, StorageResult};
use crate::filename::random_filename;

/// Local filesystem storage rooted at the configured base location.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a storage handle rooted at `base_path` (the configured
    /// `location`). The directory itself is created lazily per date bucket.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        LocalStorage {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Stage one master upload: compute the date bucket from `dir_format`,
    /// generate a random filename of `file_name_len` characters, create the
    /// directory if absent and stream the body into it.
    ///
    /// Fails with [`StorageError::TooLarge`] once the stream exceeds
    /// `max_bytes`. A partially written master is left in place on any
    /// failure; cleanup only ever runs after a fully successful transform
    /// stage.
    pub async fn stage_stream<R>(
        &self,
        dir_format: &str,
        file_name_len: usize,
        mut reader: R,
        max_bytes: u64,
    ) -> StorageResult<UploadState>
    where
        R: AsyncRead + Unpin + Send,
    {
        let bucket = format_dir(dir_format, Local::now().date_naive());
        let directory = self.base_path.join(&bucket);
        let filename = random_filename(file_name_len);
        let path = directory.join(&filename);

        fs::create_dir_all(&directory).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create directory {}: {}",
                directory.display(),
                e
            ))
        })?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        // Read one byte past the limit so an exactly-at-limit upload passes
        // and an over-limit one is caught without draining the stream.
        let mut limited = (&mut reader).take(max_bytes + 1);
        let bytes_copied = tokio::io::copy(&mut limited, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        if bytes_copied > max_bytes {
            return Err(StorageError::TooLarge {
                limit_bytes: max_bytes,
            });
        }

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Master staged"
        );

        Ok(UploadState {
            directory,
            path,
            filename,
        })
    }

    /// Remove the staged master. Unlike a tolerant delete, a missing file is
    /// an error here: the contract is to remove exactly the file named in
    /// the upload state, and its absence means something else already
    /// touched it.
    pub async fn delete_master(&self, path: &Path) -> StorageResult<()> {
        let start = std::time::Instant::now();

        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(path.display().to_string()));
        }

        fs::remove_file(path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Master removed"
        );

        Ok(())
    }
}
