use crate::http::error::{AppError, Result};
use crate::http::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use shortlink_core::ShortCode;
use shortlink_service::ServiceError;
use tracing::debug;

/// `GET /{short_code}`: answers with `302 Found` pointing at the original URL.
///
/// A malformed code cannot exist in the store, so it is reported as not
/// found like any other unknown code.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new(&short_code).map_err(|_| AppError::UrlNotFound)?;

    let target = match state.resolver().redirect(&code).await {
        Ok(target) => target,
        Err(ServiceError::NotFound(_)) => return Err(AppError::UrlNotFound),
        Err(e) => return Err(e.into()),
    };

    let location = HeaderValue::try_from(target.as_str())
        .map_err(|e| AppError::Internal(format!("stored url is not a valid header: {e}")))?;
    debug!(code = %code, location = %target.as_str(), "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
