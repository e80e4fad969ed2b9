//! Per-size variant fan-out.
//!
//! Every configured size derives independently from the shared, read-only
//! master image. Derivations run concurrently up to a fixed bound; the
//! first failure aborts the stage and is surfaced as the stage's error.
//! Variants already written before the failing one stay on storage.

use std::sync::Arc;

use futures::StreamExt;
use image::DynamicImage;
use imgstage_core::{UploadConfig, UploadState};
use tokio::task;

use crate::encode::{self, OutputFormat};
use crate::error::TransformError;
use crate::executor;
use crate::plan;

/// Upper bound on concurrently deriving sizes.
pub const MAX_CONCURRENT_VARIANTS: usize = 4;

/// Derive and write every configured size. Completion order across sizes is
/// not significant; every derivation runs to its own completion and the
/// first error in configured order becomes the stage's failure, so sizes
/// that succeeded are never torn down.
pub async fn derive_all(
    master: Arc<DynamicImage>,
    state: &UploadState,
    config: &UploadConfig,
) -> Result<(), TransformError> {
    let format = OutputFormat::parse(&config.output);

    let results: Vec<Result<(), TransformError>> = futures::stream::iter(config.sizes.clone())
        .map(|size| {
            let master = Arc::clone(&master);
            let config = config.clone();
            let out_path = state.variant_path(&size.suffix, &config.output);
            async move {
                let start = std::time::Instant::now();

                let encoded = task::spawn_blocking(move || {
                    let plan = plan::build(&config, &size);
                    let (img, params) = executor::apply(&master, &plan, config.background)?;
                    encode::encode(&img, format, &params)
                })
                .await
                .map_err(|e| TransformError::Internal(format!("variant task failed: {e}")))??;

                tokio::fs::write(&out_path, &encoded).await?;

                tracing::debug!(
                    path = %out_path.display(),
                    size_bytes = encoded.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Variant written"
                );
                Ok::<(), TransformError>(())
            }
        })
        .buffered(MAX_CONCURRENT_VARIANTS)
        .collect()
        .await;

    results.into_iter().collect()
}
