//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, username: &str) -> Result<String, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }

        if let Some(user) = self.store.get_user_by_username(username).await? {
            debug!(user_id = user.id, "Returning existing token");
            return Ok(user.token);
        }

        match self.store.create_user(username).await {
            Ok(user) => {
                metrics::counter!("users_created_total").increment(1);
                info!(user_id = user.id, username = %user.username, "Created user");
                Ok(user.token)
            }
            Err(create_err) => {
                // Lost a race against a concurrent first login for the same name
                let existing = self.store.get_user_by_username(username).await?;
                existing
                    .map(|user| user.token)
                    .ok_or_else(|| AuthError::from(create_err))
            }
        }
    }

    async fn resolve_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        Ok(self.store.get_user_by_token(token).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> SeaOrmAuthService {
        let store = Store::new("sqlite::memory:").await.unwrap();
        SeaOrmAuthService::new(store)
    }

    #[tokio::test]
    async fn test_authenticate_is_idempotent() {
        let auth = service().await;

        let first = auth.authenticate("alice").await.unwrap();
        let second = auth.authenticate("alice").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);

        let bob = auth.authenticate("bob").await.unwrap();
        assert_ne!(first, bob);
        assert_eq!(auth.store.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_authenticate_trims_username() {
        let auth = service().await;

        let first = auth.authenticate("alice").await.unwrap();
        let padded = auth.authenticate("  alice ").await.unwrap();
        assert_eq!(first, padded);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_empty_username() {
        let auth = service().await;

        assert!(matches!(
            auth.authenticate("").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.authenticate("   ").await,
            Err(AuthError::Validation(_))
        ));
        assert_eq!(auth.store.count_users().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_login_yields_one_user() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let path = std::env::temp_dir().join(format!("noted-race-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", path.display()))
            .await
            .unwrap();
        let auth = Arc::new(SeaOrmAuthService::new(store.clone()));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let auth = auth.clone();
                tokio::spawn(async move { auth.authenticate("alice").await })
            })
            .collect();

        let mut tokens = HashSet::new();
        for handle in handles {
            tokens.insert(handle.await.unwrap().unwrap());
        }

        assert_eq!(tokens.len(), 1);
        assert_eq!(store.count_users().await.unwrap(), 1);

        drop(auth);
        drop(store);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_resolve_token() {
        let auth = service().await;
        let token = auth.authenticate("alice").await.unwrap();

        let user = auth.resolve_token(&token).await.unwrap().unwrap();
        assert_eq!(user.username, "alice");

        assert!(auth.resolve_token("bad-token").await.unwrap().is_none());
        assert!(auth.resolve_token("").await.unwrap().is_none());
    }
}
