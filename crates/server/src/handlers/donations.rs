use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use haven_core::Row;

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::csv::{csv_response, rows_to_csv};
use crate::errors::{ServerError, map_db_error};
use crate::models::{CreatedResponse, DonationRequest};
use crate::validation::{email, optional, required};

const EXPORT_COLUMNS: [&str; 10] = [
    "id",
    "amount",
    "frequency",
    "payment_method",
    "first_name",
    "last_name",
    "email",
    "txnid",
    "status",
    "created_at",
];

pub const STATUS_COMPLETED: &str = "completed";

pub async fn create_donation(
    State(state): State<AppState>,
    Json(payload): Json<DonationRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServerError> {
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err(ServerError::bad_request("amount must be positive"));
    }
    let frequency = required("frequency", &payload.frequency)?;
    let payment_method = required("payment_method", &payload.payment_method)?;
    let donor_email = match optional(payload.email.as_deref()) {
        Some(raw) => Some(email(&raw)?),
        None => None,
    };

    let result = state
        .db
        .prepare(
            "INSERT INTO donations \
             (amount, frequency, payment_method, first_name, last_name, email, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .run(&[
            payload.amount.into(),
            frequency.into(),
            payment_method.into(),
            optional(payload.first_name.as_deref()).into(),
            optional(payload.last_name.as_deref()).into(),
            donor_email.into(),
            STATUS_COMPLETED.into(),
        ])
        .await
        .map_err(|e| map_db_error(e, "donation create failed"))?;

    tracing::info!(
        id = result.last_insert_rowid,
        amount = payload.amount,
        frequency,
        "donation recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: result.last_insert_rowid,
        }),
    ))
}

pub async fn list_donations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Row>>, ServerError> {
    require_admin(&state, &headers)?;
    Ok(Json(all_donations(&state).await?))
}

pub async fn export_donations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    require_admin(&state, &headers)?;
    let rows = all_donations(&state).await?;
    Ok(csv_response("donations.csv", rows_to_csv(&EXPORT_COLUMNS, &rows)))
}

async fn all_donations(state: &AppState) -> Result<Vec<Row>, ServerError> {
    state
        .db
        .prepare("SELECT * FROM donations ORDER BY created_at DESC, id DESC")
        .all(&[])
        .await
        .map_err(|e| map_db_error(e, "donations query failed"))
}
