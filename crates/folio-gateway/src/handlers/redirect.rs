use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use tracing::warn;

const NOT_FOUND_PAGE: &str = "<!DOCTYPE html>\
<html lang=\"en\"><head><meta charset=\"utf-8\"><title>404: Not Found</title></head>\
<body><h1>404</h1><p>This page could not be found.</p></body></html>";

/// Redirects `/s/{short_code}` to the stored URL.
///
/// Uses 307 so clients and caches do not pin the mapping.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let Some(record) = state.redirector.resolve(&short_code).await? else {
        return Ok(not_found());
    };

    let location = HeaderValue::from_str(&record.original_url).map_err(|_| {
        warn!(code = %record.short_code, "stored url contains characters not allowed in a header");
        AppError::InvalidRedirectTarget
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

pub async fn not_found_handler() -> Response {
    not_found()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
}
