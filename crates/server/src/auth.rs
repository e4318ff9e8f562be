use axum::http::{HeaderMap, StatusCode};
use sha2::{Digest, Sha256};

use crate::app_state::AppState;
use crate::errors::ServerError;

/// Admin routes share one bearer secret from config.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ServerError> {
    let token = bearer_token(headers)?;
    if !token_matches(&state.admin_token_hash, &token) {
        return Err(ServerError::new(StatusCode::UNAUTHORIZED, "invalid token"));
    }
    Ok(())
}

pub fn bearer_token(headers: &HeaderMap) -> Result<String, ServerError> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let token = value.strip_prefix("Bearer ").unwrap_or("").trim();
    if token.is_empty() {
        return Err(ServerError::new(
            StatusCode::UNAUTHORIZED,
            "missing bearer token",
        ));
    }
    Ok(token.to_string())
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares digests, so timing does not depend on the secret's contents.
pub fn token_matches(expected_hash: &str, candidate: &str) -> bool {
    let candidate_hash = hash_token(candidate);
    expected_hash.len() == candidate_hash.len()
        && expected_hash
            .bytes()
            .zip(candidate_hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
