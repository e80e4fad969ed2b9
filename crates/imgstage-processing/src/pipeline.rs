//! Pipeline orchestration.
//!
//! Linear state machine with failure short-circuit:
//! `UPLOADING → TRANSFORMING → CLEANING → done`. The first failing stage
//! produces a [`StageError`] tagged with the stage; later stages never run
//! and no compensating action runs (already-written variants, or a staged
//! master, stay on storage).

use std::fmt;
use std::sync::Arc;

use imgstage_core::{parse_size, AppError, UploadConfig, UploadState};
use imgstage_storage::{media_type, LocalStorage};
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::task;

use crate::error::TransformError;
use crate::variants;

/// The stage a pipeline failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Uploading,
    Transforming,
    Cleaning,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Uploading => "uploading",
            PipelineStage::Transforming => "transforming",
            PipelineStage::Cleaning => "cleaning",
        };
        f.write_str(name)
    }
}

/// First failure of a pipeline invocation, tagged with its stage.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {error}")]
pub struct StageError {
    pub stage: PipelineStage,
    #[source]
    pub error: AppError,
}

impl StageError {
    pub fn new(stage: PipelineStage, error: impl Into<AppError>) -> Self {
        StageError {
            stage,
            error: error.into(),
        }
    }
}

/// Stage the master upload: validate the declared media type against the
/// accept list, then stream the body into the date bucket. Validation
/// happens before any byte is written; a stream failing mid-write leaves
/// the partial master in place.
pub async fn stage<R>(
    storage: &LocalStorage,
    config: &UploadConfig,
    content_type: &str,
    reader: R,
) -> Result<UploadState, StageError>
where
    R: AsyncRead + Unpin + Send,
{
    media_type::check_accepted(content_type, &config.accept)
        .map_err(|e| StageError::new(PipelineStage::Uploading, e))?;

    let max_bytes = parse_size(&config.max_file_size).map_err(|e| {
        StageError::new(
            PipelineStage::Uploading,
            AppError::InvalidConfig(e.to_string()),
        )
    })?;

    storage
        .stage_stream(&config.dir_format, config.file_name_len, reader, max_bytes)
        .await
        .map_err(|e| StageError::new(PipelineStage::Uploading, e))
}

/// Run the transform and cleanup stages over an already-staged master:
/// decode it once, fan out over the configured sizes, release the decoded
/// handle, then delete the master file.
pub async fn finish(
    storage: &LocalStorage,
    config: &UploadConfig,
    state: &UploadState,
) -> Result<(), StageError> {
    let transforming = |e: TransformError| StageError::new(PipelineStage::Transforming, e);

    let data = tokio::fs::read(&state.path)
        .await
        .map_err(|e| transforming(TransformError::Io(e)))?;

    let master = task::spawn_blocking(move || {
        image::load_from_memory(&data).map_err(|e| TransformError::Decode(e.to_string()))
    })
    .await
    .map_err(|e| transforming(TransformError::Internal(format!("decode task failed: {e}"))))?
    .map_err(transforming)?;
    let master = Arc::new(master);

    let start = std::time::Instant::now();
    variants::derive_all(Arc::clone(&master), state, config)
        .await
        .map_err(transforming)?;
    tracing::info!(
        sizes = config.sizes.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "All variants derived"
    );

    // Release the decoded master before touching its file on disk. This is
    // per-invocation: no global state is shared with concurrent pipelines.
    drop(master);

    storage
        .delete_master(&state.path)
        .await
        .map_err(|e| StageError::new(PipelineStage::Cleaning, AppError::Cleanup(e.to_string())))?;

    Ok(())
}

/// Run the full pipeline for one upload. Delivers either the populated
/// `UploadState` or the first failure, exactly once.
pub async fn run<R>(
    storage: &LocalStorage,
    config: &UploadConfig,
    content_type: &str,
    reader: R,
) -> Result<UploadState, StageError>
where
    R: AsyncRead + Unpin + Send,
{
    let state = stage(storage, config, content_type, reader).await?;
    finish(storage, config, &state).await?;
    Ok(state)
}
