use axum::Json;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};
use haven_core::Row;

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::errors::{ServerError, map_db_error};
use crate::models::{CreatedResponse, ProgramRequest};
use crate::validation::{optional, required};

pub async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<Vec<Row>>, ServerError> {
    let rows = state
        .db
        .prepare("SELECT * FROM programs ORDER BY id")
        .all(&[])
        .await
        .map_err(|e| map_db_error(e, "programs query failed"))?;
    Ok(Json(rows))
}

pub async fn create_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ProgramRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServerError> {
    require_admin(&state, &headers)?;
    let title = required("title", &payload.title)?;
    let category = required("category", &payload.category)?;

    let result = state
        .db
        .prepare(
            "INSERT INTO programs (title, category, description, image, icon) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .run(&[
            title.into(),
            category.into(),
            optional(payload.description.as_deref()).into(),
            optional(payload.image.as_deref()).into(),
            optional(payload.icon.as_deref()).into(),
        ])
        .await
        .map_err(|e| map_db_error(e, "program create failed"))?;

    tracing::info!(id = result.last_insert_rowid, title, "program created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: result.last_insert_rowid,
        }),
    ))
}

pub async fn update_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<i64>,
    Json(payload): Json<ProgramRequest>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;
    let title = required("title", &payload.title)?;
    let category = required("category", &payload.category)?;

    let result = state
        .db
        .prepare(
            "UPDATE programs SET title = ?, category = ?, description = ?, image = ?, icon = ? \
             WHERE id = ?",
        )
        .run(&[
            title.into(),
            category.into(),
            optional(payload.description.as_deref()).into(),
            optional(payload.image.as_deref()).into(),
            optional(payload.icon.as_deref()).into(),
            id.into(),
        ])
        .await
        .map_err(|e| map_db_error(e, "program update failed"))?;

    if result.changes == 0 {
        return Err(ServerError::not_found("program not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<i64>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;

    let result = state
        .db
        .prepare("DELETE FROM programs WHERE id = ?")
        .run(&[id.into()])
        .await
        .map_err(|e| map_db_error(e, "program delete failed"))?;

    if result.changes == 0 {
        return Err(ServerError::not_found("program not found"));
    }
    tracing::info!(id, "program deleted");
    Ok(StatusCode::NO_CONTENT)
}
