use axum::Json;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};
use haven_core::{Row, Value};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::errors::{ServerError, map_db_error};
use crate::models::{CreatedResponse, EventRequest, RegistrationRequest};
use crate::validation::{email, optional, required};

pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<Row>>, ServerError> {
    let rows = state
        .db
        .prepare("SELECT * FROM events ORDER BY date, id")
        .all(&[])
        .await
        .map_err(|e| map_db_error(e, "events query failed"))?;
    Ok(Json(rows))
}

fn event_params(payload: &EventRequest) -> Result<Vec<Value>, ServerError> {
    let title = required("title", &payload.title)?;
    Ok(vec![
        title.into(),
        optional(payload.date.as_deref()).into(),
        optional(payload.location.as_deref()).into(),
        optional(payload.description.as_deref()).into(),
        optional(payload.image.as_deref()).into(),
    ])
}

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<EventRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServerError> {
    require_admin(&state, &headers)?;
    let params = event_params(&payload)?;

    let result = state
        .db
        .prepare(
            "INSERT INTO events (title, date, location, description, image) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .run(&params)
        .await
        .map_err(|e| map_db_error(e, "event create failed"))?;

    tracing::info!(id = result.last_insert_rowid, "event created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: result.last_insert_rowid,
        }),
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<i64>,
    Json(payload): Json<EventRequest>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;
    let mut params = event_params(&payload)?;
    params.push(id.into());

    let result = state
        .db
        .prepare(
            "UPDATE events SET title = ?, date = ?, location = ?, description = ?, image = ? \
             WHERE id = ?",
        )
        .run(&params)
        .await
        .map_err(|e| map_db_error(e, "event update failed"))?;

    if result.changes == 0 {
        return Err(ServerError::not_found("event not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Registrations are left in place.
pub async fn delete_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<i64>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;

    let result = state
        .db
        .prepare("DELETE FROM events WHERE id = ?")
        .run(&[id.into()])
        .await
        .map_err(|e| map_db_error(e, "event delete failed"))?;

    if result.changes == 0 {
        return Err(ServerError::not_found("event not found"));
    }
    tracing::info!(id, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn register(
    State(state): State<AppState>,
    AxumPath(event_id): AxumPath<i64>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServerError> {
    let name = required("name", &payload.name)?;
    let email = email(&payload.email)?;

    let event = state
        .db
        .prepare("SELECT id FROM events WHERE id = ?")
        .get(&[event_id.into()])
        .await
        .map_err(|e| map_db_error(e, "event query failed"))?;

    if event.is_none() {
        return Err(ServerError::not_found("event not found"));
    }

    let result = state
        .db
        .prepare(
            "INSERT INTO event_registrations (event_id, name, email, phone) VALUES (?, ?, ?, ?)",
        )
        .run(&[
            event_id.into(),
            name.into(),
            email.into(),
            optional(payload.phone.as_deref()).into(),
        ])
        .await
        .map_err(|e| map_db_error(e, "registration failed"))?;

    tracing::info!(id = result.last_insert_rowid, event_id, "event registration stored");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: result.last_insert_rowid,
        }),
    ))
}

pub async fn list_registrations(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(event_id): AxumPath<i64>,
) -> Result<Json<Vec<Row>>, ServerError> {
    require_admin(&state, &headers)?;

    let rows = state
        .db
        .prepare("SELECT * FROM event_registrations WHERE event_id = ? ORDER BY id")
        .all(&[event_id.into()])
        .await
        .map_err(|e| map_db_error(e, "registrations query failed"))?;
    Ok(Json(rows))
}
