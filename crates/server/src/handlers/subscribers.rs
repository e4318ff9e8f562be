use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use haven_core::Row;

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::errors::{ServerError, map_db_error};
use crate::models::{MessageResponse, SubscribeRequest};
use crate::validation::email;

/// Subscribing twice is not an error: the unique email constraint
/// reports the duplicate and the caller is told they are already on the
/// list.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ServerError> {
    let email = email(&payload.email)?;

    let inserted = state
        .db
        .prepare("INSERT INTO subscribers (email) VALUES (?)")
        .run(&[email.into()])
        .await;

    match inserted {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "subscribed".into(),
            }),
        )),
        Err(e) if e.is_unique_violation() => Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "already subscribed".into(),
            }),
        )),
        Err(e) => Err(map_db_error(e, "subscribe failed")),
    }
}

pub async fn list_subscribers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Row>>, ServerError> {
    require_admin(&state, &headers)?;

    let rows = state
        .db
        .prepare("SELECT * FROM subscribers ORDER BY created_at DESC, id DESC")
        .all(&[])
        .await
        .map_err(|e| map_db_error(e, "subscribers query failed"))?;
    Ok(Json(rows))
}
