use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::app_state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "backend": state.db.kind().as_str() }))
}
