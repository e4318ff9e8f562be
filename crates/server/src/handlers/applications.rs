use axum::Json;
use axum::extract::{Multipart, Path as AxumPath, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use haven_core::{ApplicationStatus, Row, Value};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::csv::{csv_response, rows_to_csv};
use crate::errors::{ServerError, map_db_error};
use crate::handlers::careers::find_career;
use crate::models::{CreatedResponse, StatusUpdateRequest};
use crate::validation::{email, optional, required};

const RESUME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const LIST_SQL: &str = "SELECT a.id, a.job_id, a.first_name, a.last_name, a.email, a.phone, \
     a.resume, a.resume_type, a.cover_letter, a.status, a.created_at, c.title AS job_title \
     FROM applications a LEFT JOIN careers c ON c.id = a.job_id \
     ORDER BY a.created_at DESC, a.id DESC";

const EXPORT_COLUMNS: [&str; 10] = [
    "id",
    "job_id",
    "job_title",
    "first_name",
    "last_name",
    "email",
    "phone",
    "resume",
    "status",
    "created_at",
];

#[derive(Debug, Default)]
struct ApplicationForm {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    cover_letter: Option<String>,
    resume: Option<ResumeFile>,
}

#[derive(Debug)]
struct ResumeFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_form(mut multipart: Multipart) -> Result<ApplicationForm, ServerError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "resume" {
            let filename = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| "resume".to_string());
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::bad_request(format!("resume upload failed: {e}")))?;
            form.resume = Some(ResumeFile {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| ServerError::bad_request(format!("invalid field {name}: {e}")))?;

        match name.as_str() {
            "first_name" | "firstName" => form.first_name = text,
            "last_name" | "lastName" => form.last_name = text,
            "email" => form.email = text,
            "phone" => form.phone = optional(Some(text.as_str())),
            "cover_letter" | "coverLetter" => form.cover_letter = optional(Some(text.as_str())),
            _ => {}
        }
    }

    Ok(form)
}

fn check_resume(resume: &ResumeFile) -> Result<(), ServerError> {
    if resume.bytes.is_empty() {
        return Err(ServerError::bad_request("resume is empty"));
    }
    if resume.bytes.len() > MAX_RESUME_BYTES {
        return Err(ServerError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "resume exceeds 5 MB",
        ));
    }
    if !RESUME_TYPES.contains(&resume.content_type.as_str()) {
        return Err(ServerError::bad_request(
            "resume must be a PDF or Word document",
        ));
    }
    Ok(())
}

/// Stores the resume bytes in the row itself; status starts as the
/// column default.
pub async fn apply(
    State(state): State<AppState>,
    AxumPath(job_id): AxumPath<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedResponse>), ServerError> {
    if find_career(&state.db, job_id).await?.is_none() {
        return Err(ServerError::not_found("career not found"));
    }

    let form = read_form(multipart).await?;
    let first_name = required("first_name", &form.first_name)?;
    let last_name = required("last_name", &form.last_name)?;
    let email = email(&form.email)?;

    let (resume, resume_data, resume_type) = match form.resume {
        Some(file) => {
            check_resume(&file)?;
            (
                Value::from(file.filename),
                Value::Blob(file.bytes),
                Value::from(file.content_type),
            )
        }
        None => (Value::Null, Value::Null, Value::Null),
    };

    let result = state
        .db
        .prepare(
            "INSERT INTO applications \
             (job_id, first_name, last_name, email, phone, resume, resume_data, resume_type, cover_letter) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .run(&[
            job_id.into(),
            first_name.into(),
            last_name.into(),
            email.into(),
            form.phone.into(),
            resume,
            resume_data,
            resume_type,
            form.cover_letter.into(),
        ])
        .await
        .map_err(|e| map_db_error(e, "application create failed"))?;

    tracing::info!(id = result.last_insert_rowid, job_id, "application received");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: result.last_insert_rowid,
        }),
    ))
}

pub async fn list_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Row>>, ServerError> {
    require_admin(&state, &headers)?;
    Ok(Json(all_applications(&state).await?))
}

pub async fn export_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    require_admin(&state, &headers)?;
    let rows = all_applications(&state).await?;
    Ok(csv_response(
        "applications.csv",
        rows_to_csv(&EXPORT_COLUMNS, &rows),
    ))
}

async fn all_applications(state: &AppState) -> Result<Vec<Row>, ServerError> {
    state
        .db
        .prepare(LIST_SQL)
        .all(&[])
        .await
        .map_err(|e| map_db_error(e, "applications query failed"))
}

/// The only mutation an application ever sees.
pub async fn update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<i64>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;
    let status: ApplicationStatus = payload
        .status
        .parse()
        .map_err(ServerError::bad_request)?;

    let result = state
        .db
        .prepare("UPDATE applications SET status = ? WHERE id = ?")
        .run(&[status.as_str().into(), id.into()])
        .await
        .map_err(|e| map_db_error(e, "application status update failed"))?;

    if result.changes == 0 {
        return Err(ServerError::not_found("application not found"));
    }
    tracing::info!(id, status = %status, "application status updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<i64>,
) -> Result<Response, ServerError> {
    require_admin(&state, &headers)?;

    let mut row = state
        .db
        .prepare("SELECT resume, resume_data, resume_type FROM applications WHERE id = ?")
        .get(&[id.into()])
        .await
        .map_err(|e| map_db_error(e, "resume query failed"))?
        .ok_or_else(|| ServerError::not_found("application not found"))?;

    let Some(Value::Blob(bytes)) = row.remove("resume_data") else {
        return Err(ServerError::not_found("no resume on file"));
    };

    let filename = row
        .text("resume")
        .unwrap_or("resume")
        .replace(['"', '\r', '\n'], "");
    let content_type = row
        .text("resume_type")
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok((
        [
            (CONTENT_TYPE, content_type),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
