//! Note endpoints.
//!
//! Handlers only do HTTP/JSON mapping; token checks and validation live in
//! [`NoteService`](crate::services::NoteService).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use std::sync::Arc;

use super::auth::extract_token;
use super::{ApiError, AppState, SaveNoteBody, SaveNoteResponse};
use crate::models::Note;
use crate::services::SaveNoteRequest;

/// POST /notes
pub async fn save_note(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveNoteBody>, JsonRejection>,
) -> Result<Json<SaveNoteResponse>, ApiError> {
    let Json(body) = payload?;

    let note_id = state
        .note_service()
        .save_note(SaveNoteRequest {
            token: body.token,
            domain: body.domain,
            content: body.content,
            url: body.url,
        })
        .await?;

    Ok(Json(SaveNoteResponse {
        success: true,
        note_id,
    }))
}

/// GET /notes
/// Token goes in the `Authorization` header; returns newest first
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Note>>, ApiError> {
    let token = extract_token(&headers);

    let notes = state.note_service().list_notes(token.as_deref()).await?;

    Ok(Json(notes))
}
