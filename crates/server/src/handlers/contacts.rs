use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use haven_core::Row;

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::csv::{csv_response, rows_to_csv};
use crate::errors::{ServerError, map_db_error};
use crate::models::{ContactRequest, CreatedResponse};
use crate::validation::{email, optional, required};

const EXPORT_COLUMNS: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "subject",
    "message",
    "created_at",
];

pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServerError> {
    let first_name = required("first_name", &payload.first_name)?;
    let last_name = required("last_name", &payload.last_name)?;
    let email = email(&payload.email)?;
    let message = required("message", &payload.message)?;

    let result = state
        .db
        .prepare(
            "INSERT INTO contacts (first_name, last_name, email, subject, message) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .run(&[
            first_name.into(),
            last_name.into(),
            email.into(),
            optional(payload.subject.as_deref()).into(),
            message.into(),
        ])
        .await
        .map_err(|e| map_db_error(e, "contact create failed"))?;

    tracing::info!(id = result.last_insert_rowid, "contact message stored");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: result.last_insert_rowid,
        }),
    ))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Row>>, ServerError> {
    require_admin(&state, &headers)?;
    Ok(Json(all_contacts(&state).await?))
}

pub async fn export_contacts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    require_admin(&state, &headers)?;
    let rows = all_contacts(&state).await?;
    Ok(csv_response("contacts.csv", rows_to_csv(&EXPORT_COLUMNS, &rows)))
}

async fn all_contacts(state: &AppState) -> Result<Vec<Row>, ServerError> {
    state
        .db
        .prepare("SELECT * FROM contacts ORDER BY created_at DESC, id DESC")
        .all(&[])
        .await
        .map_err(|e| map_db_error(e, "contacts query failed"))
}
