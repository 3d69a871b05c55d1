use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Coarse classification of an [`AppError`], used for status mapping and by
/// callers that need to branch on the failure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UnsupportedMedia,
    Upstream,
    Storage,
    Persistence,
    Query,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("empty API key")]
    EmptyApiKey,

    #[error("invalid date")]
    InvalidDate,

    #[error("unable to call APOD: {0:#}")]
    UpstreamFetch(anyhow::Error),

    #[error("unsupported media type")]
    UnsupportedMediaType(String),

    #[error("unable to get image: {0:#}")]
    ImageRetrieval(anyhow::Error),

    #[error("unable to save image: {0:#}")]
    ObjectStorage(anyhow::Error),

    #[error("unable to save file reference: {0:#}")]
    FileRecordPersistence(anyhow::Error),

    #[error("unable to save entry: {0:#}")]
    EntryPersistence(anyhow::Error),

    #[error("unable to retrieve entries from the database: {0:#}")]
    EntryQuery(anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::EmptyApiKey | AppError::InvalidDate => ErrorKind::Validation,
            AppError::UnsupportedMediaType(_) => ErrorKind::UnsupportedMedia,
            AppError::UpstreamFetch(_) | AppError::ImageRetrieval(_) => ErrorKind::Upstream,
            AppError::ObjectStorage(_) => ErrorKind::Storage,
            AppError::FileRecordPersistence(_) | AppError::EntryPersistence(_) => {
                ErrorKind::Persistence
            }
            AppError::EntryQuery(_) => ErrorKind::Query,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            // Query failures surface as 400 on the listing endpoint.
            ErrorKind::Validation | ErrorKind::UnsupportedMedia | ErrorKind::Query => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::Upstream | ErrorKind::Storage | ErrorKind::Persistence => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match self.kind() {
            ErrorKind::Validation | ErrorKind::UnsupportedMedia => {
                tracing::debug!("Rejected request: {message}")
            }
            _ => tracing::error!(kind = ?self.kind(), "{message}"),
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
