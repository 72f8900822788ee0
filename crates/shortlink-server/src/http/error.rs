use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shortlink_service::ServiceError;
use tracing::error;

use crate::http::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The redirect route found nothing to redirect to.
    UrlNotFound,
    /// The request body or query could not be read.
    BadRequest(String),
    Service(ServiceError),
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(error: ServiceError) -> Self {
        AppError::Service(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UrlNotFound => (StatusCode::NOT_FOUND, "URL not found".to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Service(error) if error.is_invalid_input() => {
                (StatusCode::BAD_REQUEST, error.to_string())
            }
            AppError::Service(error @ ServiceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, error.to_string())
            }
            AppError::Service(error) => {
                error!(error = %error, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::Internal(message) => {
                error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
