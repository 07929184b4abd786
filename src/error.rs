//! Error types for Imprenta Server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::render::RenderError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Credentials absent or wrong. Answered with a bare 404 so the
    /// endpoint stays indistinguishable from a missing route.
    #[error("unknown client or key")]
    Unauthorized,

    /// The upload carried no part filenamed `doc.html`.
    #[error("No doc file provided")]
    MissingDocument,

    /// A query parameter held a value outside the supported set.
    #[error("Unsupported {name} value: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// The multipart body could not be read.
    #[error("Invalid upload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// The request body was not multipart form data at all.
    #[error("Invalid upload: {0}")]
    UnsupportedBody(#[from] axum::extract::multipart::MultipartRejection),

    /// The rendering engine failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Staging the upload failed.
    #[error("failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Error payload returned to clients
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_trace: Option<String>,
}

impl AppError {
    /// Failure trace shipped with 500 responses.
    fn stack_trace(&self) -> String {
        match self {
            AppError::Render(err) => err.trace(),
            other => {
                let mut trace = other.to_string();
                let mut source = std::error::Error::source(other);
                while let Some(cause) = source {
                    trace.push_str("\ncaused by: ");
                    trace.push_str(&cause.to_string());
                    source = cause.source();
                }
                trace
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Unauthorized => StatusCode::NOT_FOUND.into_response(),

            AppError::MissingDocument
            | AppError::InvalidParameter { .. }
            | AppError::Multipart(_)
            | AppError::UnsupportedBody(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: self.to_string(),
                    stack_trace: None,
                }),
            )
                .into_response(),

            AppError::Render(_) | AppError::Io(_) => {
                tracing::error!("Conversion failed: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: self.to_string(),
                        stack_trace: Some(self.stack_trace()),
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_document_uses_the_legacy_message() {
        assert_eq!(AppError::MissingDocument.to_string(), "No doc file provided");
    }

    #[test]
    fn stack_traces_include_the_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "temp root is read-only");
        let trace = AppError::Io(io).stack_trace();
        assert!(trace.contains("temp root is read-only"), "trace was: {trace}");
    }
}
