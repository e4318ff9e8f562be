use axum::Json;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};
use haven_core::{Database, Row, Value};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::errors::{ServerError, map_db_error};
use crate::models::{CareerRequest, CreatedResponse};
use crate::validation::{optional, required};

pub async fn list_careers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Row>>, ServerError> {
    let rows = state
        .db
        .prepare("SELECT * FROM careers ORDER BY created_at DESC, id DESC")
        .all(&[])
        .await
        .map_err(|e| map_db_error(e, "careers query failed"))?;
    Ok(Json(rows))
}

pub async fn career_detail(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
) -> Result<Json<Row>, ServerError> {
    find_career(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::not_found("career not found"))
}

pub(crate) async fn find_career(db: &Database, id: i64) -> Result<Option<Row>, ServerError> {
    db.prepare("SELECT * FROM careers WHERE id = ?")
        .get(&[id.into()])
        .await
        .map_err(|e| map_db_error(e, "career query failed"))
}

fn career_params(payload: &CareerRequest) -> Result<Vec<Value>, ServerError> {
    let title = required("title", &payload.title)?;
    Ok(vec![
        title.into(),
        optional(payload.department.as_deref()).into(),
        optional(payload.location.as_deref()).into(),
        optional(payload.kind.as_deref()).into(),
        optional(payload.description.as_deref()).into(),
        optional(payload.requirements.as_deref()).into(),
    ])
}

pub async fn create_career(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CareerRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServerError> {
    require_admin(&state, &headers)?;
    let params = career_params(&payload)?;

    let result = state
        .db
        .prepare(
            "INSERT INTO careers (title, department, location, type, description, requirements) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .run(&params)
        .await
        .map_err(|e| map_db_error(e, "career create failed"))?;

    tracing::info!(id = result.last_insert_rowid, "career created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: result.last_insert_rowid,
        }),
    ))
}

pub async fn update_career(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<i64>,
    Json(payload): Json<CareerRequest>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;
    let mut params = career_params(&payload)?;
    params.push(id.into());

    let result = state
        .db
        .prepare(
            "UPDATE careers SET title = ?, department = ?, location = ?, type = ?, \
             description = ?, requirements = ? WHERE id = ?",
        )
        .run(&params)
        .await
        .map_err(|e| map_db_error(e, "career update failed"))?;

    if result.changes == 0 {
        return Err(ServerError::not_found("career not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Applications keep their `job_id`; listings show a null job title.
pub async fn delete_career(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<i64>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;

    let result = state
        .db
        .prepare("DELETE FROM careers WHERE id = ?")
        .run(&[id.into()])
        .await
        .map_err(|e| map_db_error(e, "career delete failed"))?;

    if result.changes == 0 {
        return Err(ServerError::not_found("career not found"));
    }
    tracing::info!(id, "career deleted");
    Ok(StatusCode::NO_CONTENT)
}
