//! Domain service for token authentication.
//!
//! A username maps to exactly one opaque bearer token for all time. Logging in
//! creates the mapping on first sight and returns the existing token after.

use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Returns the token for `username`, creating the user if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the username is empty.
    async fn authenticate(&self, username: &str) -> Result<String, AuthError>;

    /// Resolves a bearer token to its owner. Blank tokens resolve to `None`.
    async fn resolve_token(&self, token: &str) -> Result<Option<User>, AuthError>;
}
