use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use cerqueira_common::{SiteConfig, SiteConfigPayload};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

use super::json_body;

pub async fn api_config(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<SiteConfig>, ApiError> {
    state
        .store
        .site_config()
        .await
        .map_err(ApiError::Store)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Site configuration not found".to_string()))
}

pub async fn api_config_update(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    payload: Result<Json<SiteConfigPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let update = json_body(payload)?.validate()?;

    let changed = state
        .store
        .update_site_config(&update)
        .await
        .map_err(ApiError::Store)?;
    if changed == 0 {
        return Err(ApiError::NotFound(
            "Site configuration not found to update".to_string(),
        ));
    }

    info!(sub = %claims.sub, "Site configuration updated");
    Ok(Json(json!({
        "success": true,
        "message": "Site configuration updated successfully",
    })))
}
