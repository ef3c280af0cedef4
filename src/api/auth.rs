use axum::{Json, extract::State, extract::rejection::JsonRejection, http::HeaderMap};
use std::sync::Arc;

use super::{ApiError, AppState, AuthRequest, AuthResponse};

/// POST /auth
/// Log in (or register on first sight) with a bare username, returns the token
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(payload) = payload?;

    let username = payload.username.unwrap_or_default();
    if username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }

    let token = state.auth_service().authenticate(&username).await?;

    Ok(Json(AuthResponse { token }))
}

/// Extract the bearer token from the `Authorization` header.
///
/// The dashboard sends the raw token; `Bearer <token>` is accepted as well.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
