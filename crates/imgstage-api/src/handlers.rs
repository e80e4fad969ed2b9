//! Upload handler.
//!
//! The request-scoped pipeline boundary: stream the configured multipart
//! field to storage, reject a second file on the same field, then run the
//! transform and cleanup stages. On success the response carries the
//! `UploadState`; on failure, exactly one error object.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use imgstage_core::{AppError, UploadState};
use imgstage_processing::pipeline;
use tokio_util::io::StreamReader;

use crate::error::HttpError;
use crate::state::AppState;

#[tracing::instrument(skip(state, multipart), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, HttpError> {
    let config = &state.config;
    let mut staged: Option<UploadState> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::uploading(AppError::Storage(e.to_string())))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name != config.field {
            // Unrelated fields are ignored, not errors.
            continue;
        }
        if staged.is_some() {
            return Err(HttpError::uploading(AppError::TooManyFiles { field: name }));
        }

        let content_type = field.content_type().unwrap_or_default().to_owned();
        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        staged = Some(pipeline::stage(&state.storage, config, &content_type, reader).await?);
    }

    let staged = staged.ok_or_else(|| {
        HttpError::uploading(AppError::MissingFile {
            field: config.field.clone(),
        })
    })?;

    pipeline::finish(&state.storage, config, &staged).await?;

    Ok((StatusCode::CREATED, Json(staged)).into_response())
}
