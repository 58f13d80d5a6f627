//! Unified error handling for admin.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry and answered with a generic message; client errors
//! carry their own message. Bodies are `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use keystone_core::gallery::GalleryError;

use crate::db::RepositoryError;
use crate::services::UploadError;

/// Application-level error type for the back-office API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Upload provider failed or a file was refused.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// A gallery edit broke a gallery rule.
    #[error("{0}")]
    Gallery(#[from] GalleryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or wrong API token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound)
            | Self::NotFound(_)
            | Self::Gallery(GalleryError::UnknownImage(_)) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upload(UploadError::TooLarge { .. }) | Self::PayloadTooLarge(_) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::Upload(UploadError::NotAnImage { .. } | UploadError::EmptyFile(_))
            | Self::Gallery(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upload(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            _ if status == StatusCode::BAD_GATEWAY => "Upload provider error".to_string(),
            _ if status.is_server_error() => "Internal server error".to_string(),
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Upload(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use keystone_core::GalleryImageId;
    use keystone_core::gallery::ImageKey;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("project".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict("slug".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Unauthorized("token".to_string())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_gallery_errors_are_client_errors() {
        let unknown = ImageKey::Persisted(GalleryImageId::new(3));
        assert_eq!(
            get_status(AppError::Gallery(GalleryError::UnknownImage(unknown))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Gallery(GalleryError::MultipleFeatures { count: 2 })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Gallery(GalleryError::PositionOutOfRange {
                position: 9,
                len: 2
            })),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upload_errors() {
        assert_eq!(
            get_status(AppError::Upload(UploadError::TooLarge {
                name: "a.jpg".into(),
                size: 10,
                max: 5
            })),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(AppError::Upload(UploadError::NotAnImage {
                name: "a.pdf".into(),
                content_type: "application/pdf".into()
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Upload(UploadError::Unauthorized)),
            StatusCode::BAD_GATEWAY
        );
    }
}
