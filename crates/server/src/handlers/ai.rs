use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::ai::{ASSISTANT_INSTRUCTION, AiError, Role, impact_story_prompt};
use crate::app_state::AppState;
use crate::errors::ServerError;
use crate::models::{ChatRequest, ChatResponse, ImpactStoryRequest, ImpactStoryResponse};
use crate::validation::required;

/// Oldest turns are dropped past this.
const MAX_HISTORY: usize = 20;

fn upstream_error(err: AiError) -> ServerError {
    tracing::warn!(error = %err, "ai request failed");
    ServerError::new(StatusCode::BAD_GATEWAY, "assistant unavailable")
}

fn disabled() -> ServerError {
    ServerError::new(
        StatusCode::SERVICE_UNAVAILABLE,
        "assistant is not configured",
    )
}

pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let client = state.ai.as_ref().ok_or_else(disabled)?;
    let message = required("message", &payload.message)?;

    let skip = payload.history.len().saturating_sub(MAX_HISTORY);
    let mut turns: Vec<(Role, String)> = payload
        .history
        .into_iter()
        .skip(skip)
        .filter(|t| !t.text.trim().is_empty())
        .map(|t| (Role::parse(&t.role), t.text))
        .collect();
    turns.push((Role::User, message.to_string()));

    let reply = client
        .generate(Some(ASSISTANT_INSTRUCTION), &turns)
        .await
        .map_err(upstream_error)?;
    Ok(Json(ChatResponse { reply }))
}

pub async fn impact_story(
    State(state): State<AppState>,
    Json(payload): Json<ImpactStoryRequest>,
) -> Result<Json<ImpactStoryResponse>, ServerError> {
    let client = state.ai.as_ref().ok_or_else(disabled)?;
    let program = required("program", &payload.program)?;

    let prompt = impact_story_prompt(payload.name.as_deref(), program, payload.amount);
    let story = client
        .generate(None, &[(Role::User, prompt)])
        .await
        .map_err(upstream_error)?;
    Ok(Json(ImpactStoryResponse { story }))
}
