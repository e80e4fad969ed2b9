//! HTTP error response conversion.
//!
//! Handlers return `Result<Response, HttpError>`; the conversion renders
//! the caller-facing error object `{error, code, field?}` with a status
//! mapped from the taxonomy, and logs internal failures at error level and
//! bad-input failures at warn.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgstage_core::AppError;
use imgstage_processing::{PipelineStage, StageError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug)]
pub struct HttpError(pub StageError);

impl From<StageError> for HttpError {
    fn from(err: StageError) -> Self {
        HttpError(err)
    }
}

impl HttpError {
    /// An error raised at the request boundary itself, before or between
    /// pipeline stages; attributed to the upload stage.
    pub fn uploading(error: AppError) -> Self {
        HttpError(StageError::new(PipelineStage::Uploading, error))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let StageError { stage, error } = self.0;

        if error.is_client_error() {
            tracing::warn!(%stage, code = error.code().as_str(), "Upload rejected: {error}");
        } else {
            tracing::error!(%stage, code = error.code().as_str(), "Pipeline failed: {error}");
        }

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: error.to_string(),
            code: error.code().as_str().to_string(),
            field: error.field().map(str::to_owned),
        };
        (status, Json(body)).into_response()
    }
}
