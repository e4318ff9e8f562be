use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::auth::token_matches;
use crate::errors::ServerError;
use crate::models::LoginRequest;

/// Lets the admin UI check a pasted token before storing it.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ServerError> {
    let token = payload.token.trim();
    if token.is_empty() {
        return Err(ServerError::bad_request("token required"));
    }

    if !token_matches(&state.admin_token_hash, token) {
        tracing::warn!("admin login rejected");
        return Err(ServerError::new(StatusCode::UNAUTHORIZED, "invalid token"));
    }

    Ok(Json(json!({ "ok": true })))
}
