//! JSON error responses.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use newsletter_core::NewsletterError;
use serde_json::json;

/// Message returned when composition fails for lack of content.
pub const GENERATION_FAILED: &str = "Failed to generate newsletter";

/// An error answered as `{"error": message}` with `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
    }

    /// Map a pipeline failure for a source described as `source` ("URL",
    /// "file").
    pub fn from_pipeline(err: NewsletterError, source: &str) -> Self {
        match err {
            NewsletterError::ExtractionFailed(_) => {
                Self::bad_request(format!("Could not extract content from {}", source))
            }
            NewsletterError::ContentTooShort { .. } => Self::internal(GENERATION_FAILED),
            e if e.is_client_error() => Self::bad_request(e.to_string()),
            e => Self::internal(e.to_string()),
        }
    }
}

impl From<NewsletterError> for ApiError {
    fn from(err: NewsletterError) -> Self {
        if err.is_client_error() { Self::bad_request(err.to_string()) } else { Self::internal(err.to_string()) }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self { status: err.status(), message: err.body_text() }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::bad_request(err.body_text())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.message, "request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_mapping() {
        let extraction = ApiError::from_pipeline(NewsletterError::ExtractionFailed("https://x".into()), "URL");
        assert_eq!(extraction, ApiError::bad_request("Could not extract content from URL"));

        let short = ApiError::from_pipeline(NewsletterError::ContentTooShort { length: 3, minimum: 50 }, "file");
        assert_eq!(short, ApiError::internal(GENERATION_FAILED));

        let incomplete =
            ApiError::from_pipeline(NewsletterError::Incomplete { missing: vec!["title".into()] }, "URL");
        assert_eq!(incomplete.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(incomplete.message, "Local model generation failed to produce: title");

        let unsupported = ApiError::from_pipeline(NewsletterError::UnsupportedFileType("txt".into()), "file");
        assert_eq!(unsupported.status, StatusCode::BAD_REQUEST);
    }
}
