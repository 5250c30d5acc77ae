use crate::error::{AppError, Result};
use crate::model::{CreateShortUrlRequest, CreateShortUrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

pub async fn create_short_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<Json<CreateShortUrlResponse>> {
    let Json(request) =
        payload.map_err(|rejection| AppError::InvalidShortenRequest(rejection.body_text()))?;

    let url = request.url.unwrap_or_default();
    let allocation = state.shortener.allocate(&url).await?;

    Ok(Json(CreateShortUrlResponse {
        short_url: allocation.short_url,
        original_url: allocation.original_url,
    }))
}

pub async fn shorten_method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
