use crate::http::error::{AppError, Result};
use crate::http::model::{CreateUrlRequest, ShortUrlQuery, ShortUrlResponse, UrlResponse};
use crate::http::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shortlink_core::ShortCode;
use shortlink_service::ServiceError;

pub async fn create_url_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlResponse>)> {
    let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let record = state.resolver().create(&request.original_url).await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn get_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlResponse>> {
    let code = ShortCode::new(&short_url).map_err(ServiceError::from)?;

    let resolved = state.resolver().resolve_by_code(&code).await?;

    Ok(Json(resolved.into()))
}

pub async fn get_short_url_handler(
    Query(query): Query<ShortUrlQuery>,
    State(state): State<AppState>,
) -> Result<Json<ShortUrlResponse>> {
    let original_url = query
        .original_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::BadRequest("original_url is required".to_string()))?;

    let code = state.resolver().resolve_code_by_url(&original_url).await?;

    Ok(Json(ShortUrlResponse {
        short_url: code.into(),
    }))
}
