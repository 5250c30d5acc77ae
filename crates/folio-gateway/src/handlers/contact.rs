use crate::error::{AppError, Result};
use crate::model::{ContactRequest, ContactResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use folio_core::{ContactError, ContactMessage};
use serde_json::{json, Value};
use tracing::info;

pub async fn create_contact_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let Json(request) =
        payload.map_err(|rejection| AppError::InvalidContactRequest(rejection.body_text()))?;

    let message = ContactMessage::new(
        &request.name,
        &request.email,
        &request.subject,
        &request.message,
        state.clock.now(),
    )?;
    state.contacts.save(message).await.map_err(ContactError::from)?;
    info!("contact message stored");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: "Message sent successfully".to_string(),
        }),
    ))
}

pub async fn contact_method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "Method not allowed" })),
    )
}
