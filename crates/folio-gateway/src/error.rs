use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::{ContactError, RedirectorError, ShortenerError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Request failures, rendered in the shape each API uses.
///
/// The shortener API answers `{ "error": ... }`, the contact API
/// `{ "message": ... }` and the redirect path plain text. Store failures are
/// logged here and replaced by a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error("{0}")]
    InvalidShortenRequest(String),
    #[error(transparent)]
    Redirector(#[from] RedirectorError),
    #[error("stored url cannot be used as a redirect location")]
    InvalidRedirectTarget,
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error("{0}")]
    InvalidContactRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Shortener(ShortenerError::Validation(message))
            | AppError::InvalidShortenRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::Shortener(err) => {
                error!(error = %err, "error creating short url");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Error creating short URL" })),
                )
                    .into_response()
            }
            AppError::Redirector(err) => {
                error!(error = %err, "error resolving short url");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            // Logged by the redirect handler with the offending code.
            AppError::InvalidRedirectTarget => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            AppError::Contact(ContactError::Validation(message))
            | AppError::InvalidContactRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            AppError::Contact(err) => {
                error!(error = %err, "error saving contact message");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Error sending message" })),
                )
                    .into_response()
            }
        }
    }
}
