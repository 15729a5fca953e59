//! # API Errors
//!
//! Single error type the HTTP layer maps every module failure into.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::AuthError;
use crate::geo::GeoError;
use crate::models::ValidationError;
use crate::store::StoreError;
use crate::uploads::UploadError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// An HTTP-mappable error
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 404 for a missing resource
    pub fn not_found(resource: &str, id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{} not found with id of {}", resource, id),
        )
    }

    /// 400 with a caller-facing message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 500 with a caller-facing message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

fn from_status(code: u16, message: String) -> ApiError {
    ApiError::new(
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        message,
    )
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        from_status(err.status_code(), err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        from_status(err.status_code(), err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        from_status(err.status_code(), err.to_string())
    }
}

impl From<GeoError> for ApiError {
    fn from(err: GeoError) -> Self {
        from_status(err.status_code(), err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ApiError::not_found("Bootcamp", "abc");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Bootcamp not found with id of abc");
    }

    #[test]
    fn test_module_error_mapping() {
        let err: ApiError = StoreError::NotAnObject.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = AuthError::AuthenticationRequired.into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let err: ApiError = UploadError::NotAnImage.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = ValidationError::new("name", "must not be empty").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
