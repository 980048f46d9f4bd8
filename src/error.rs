use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::session::SessionId;

/// Failures of a single explanation request.
#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("request to generation API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed generation API response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("generation API returned no text")]
    EmptyResponse,

    #[error("file is {size} bytes but submissions are limited to {limit} bytes")]
    SubmissionTooLarge { size: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, ExplainError>;

/// Errors surfaced at the HTTP boundary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("unknown session {0}")]
    SessionNotFound(SessionId),

    #[error("invalid upload: {0}")]
    BadUpload(String),

    #[error("an explanation is already in progress")]
    Busy,

    #[error("no file selected")]
    NoFile,

    #[error(transparent)]
    Explain(#[from] ExplainError),
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadUpload(err.body_text())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadUpload(_) | AppError::NoFile => StatusCode::BAD_REQUEST,
            AppError::Busy => StatusCode::CONFLICT,
            AppError::Explain(ExplainError::SubmissionTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::Explain(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
