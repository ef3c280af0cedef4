//! Domain service for saving and listing notes.
//!
//! Every call is gated by a bearer token; the token alone decides which user
//! the notes belong to.

use thiserror::Error;

use crate::models::Note;

/// Errors specific to note operations.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sea_orm::DbErr> for NoteError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for NoteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

impl From<crate::services::AuthError> for NoteError {
    fn from(err: crate::services::AuthError) -> Self {
        match err {
            crate::services::AuthError::Validation(msg) => Self::Validation(msg),
            crate::services::AuthError::Storage(msg) => Self::Storage(msg),
        }
    }
}

/// A save request as received from the client. Missing fields are `None`.
#[derive(Debug, Clone, Default)]
pub struct SaveNoteRequest {
    pub token: Option<String>,
    pub domain: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
}

/// Domain service trait for notes.
#[async_trait::async_trait]
pub trait NoteService: Send + Sync {
    /// Appends a note for the token's owner and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Unauthorized`] for an absent or unknown token and
    /// [`NoteError::Validation`] when domain or content is missing.
    async fn save_note(&self, request: SaveNoteRequest) -> Result<i32, NoteError>;

    /// Lists the token owner's notes, newest first.
    async fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>, NoteError>;
}
