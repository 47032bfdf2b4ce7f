//! Mapping of request failures to HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::analysis::AnalysisError;
use crate::processing::UploadError;
use crate::services::ServiceError;

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] ServiceError),

    #[error("{0} is not configured")]
    Unavailable(&'static str),
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Upload(e) => ApiError::Upload(e),
            AnalysisError::Generation(e) => ApiError::Upstream(e),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart body: {err}"))
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upload(UploadError::NoReadableText | UploadError::Unreadable(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Upload(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(ServiceError::NotConfigured(_)) | ApiError::Unavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(UploadError::Exclusive).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(UploadError::NoReadableText).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ServiceError::NotConfigured("Whisper")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(ServiceError::InvalidResponse {
                service: "Gemini",
                message: "bad".to_string(),
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_exclusivity_message() {
        let err = ApiError::from(UploadError::Exclusive);
        assert_eq!(
            err.to_string(),
            "Please upload either a medical image or a health report, not both."
        );
    }
}
