use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use cerqueira_common::ContactPayload;

use crate::error::ApiError;
use crate::AppState;

use super::json_body;

/// `POST /api/contato`: store a contact-form message.
pub async fn api_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let message = json_body(payload)?.validate()?;

    state
        .store
        .insert_contact_message(&message)
        .await
        .map_err(ApiError::Store)?;

    info!("Contact message received");
    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully!",
    })))
}
