//! `SeaORM` implementation of the `NoteService` trait.

use std::sync::Arc;

use crate::db::{Store, User};
use crate::models::{NewNote, Note};
use crate::services::auth_service::AuthService;
use crate::services::note_service::{NoteError, NoteService, SaveNoteRequest};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmNoteService {
    store: Store,
    auth: Arc<dyn AuthService>,
}

impl SeaOrmNoteService {
    #[must_use]
    pub fn new(store: Store, auth: Arc<dyn AuthService>) -> Self {
        Self { store, auth }
    }

    async fn authorize(&self, token: &str) -> Result<User, NoteError> {
        self.auth
            .resolve_token(token)
            .await?
            .ok_or_else(|| NoteError::Unauthorized("Invalid token".to_string()))
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl NoteService for SeaOrmNoteService {
    async fn save_note(&self, request: SaveNoteRequest) -> Result<i32, NoteError> {
        let token = present(request.token)
            .ok_or_else(|| NoteError::Unauthorized("No token provided".to_string()))?;

        let (Some(domain), Some(content)) = (present(request.domain), present(request.content))
        else {
            return Err(NoteError::Validation("Missing fields".to_string()));
        };

        let user = self.authorize(&token).await?;

        let note_id = self
            .store
            .insert_note(NewNote {
                user_id: user.id,
                domain,
                content,
                url: present(request.url),
            })
            .await?;

        metrics::counter!("notes_saved_total").increment(1);
        info!(user_id = user.id, note_id, "Saved note");

        Ok(note_id)
    }

    async fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>, NoteError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| NoteError::Unauthorized("No token provided".to_string()))?;

        let user = self.authorize(token).await?;
        let notes = self.store.list_notes_for_user(user.id).await?;

        debug!(user_id = user.id, count = notes.len(), "Listed notes");
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SeaOrmAuthService;

    async fn services() -> (SeaOrmNoteService, Arc<dyn AuthService>, Store) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let auth: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(store.clone()));
        let notes = SeaOrmNoteService::new(store.clone(), auth.clone());
        (notes, auth, store)
    }

    fn request(token: &str, domain: &str, content: &str) -> SaveNoteRequest {
        SaveNoteRequest {
            token: Some(token.to_string()),
            domain: Some(domain.to_string()),
            content: Some(content.to_string()),
            url: None,
        }
    }

    #[tokio::test]
    async fn test_save_then_list_returns_newest_first() {
        let (notes, auth, _) = services().await;
        let token = auth.authenticate("alice").await.unwrap();

        let first = notes
            .save_note(request(&token, "example.com", "<p>one</p>"))
            .await
            .unwrap();
        let second = notes
            .save_note(request(&token, "example.com", "<p>two</p>"))
            .await
            .unwrap();
        assert_ne!(first, second);

        let listed = notes.list_notes(Some(&token)).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[0].content, "<p>two</p>");
        assert_eq!(listed[1].id, first);
    }

    #[tokio::test]
    async fn test_list_empty_is_not_an_error() {
        let (notes, auth, _) = services().await;
        let token = auth.authenticate("alice").await.unwrap();

        assert!(notes.list_notes(Some(&token)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized_and_does_not_mutate() {
        let (notes, _, store) = services().await;

        let result = notes
            .save_note(request("bad-token", "example.com", "<p>hi</p>"))
            .await;
        assert!(matches!(result, Err(NoteError::Unauthorized(_))));

        let result = notes
            .save_note(SaveNoteRequest {
                token: None,
                ..request("", "example.com", "<p>hi</p>")
            })
            .await;
        assert!(matches!(result, Err(NoteError::Unauthorized(_))));

        assert!(matches!(
            notes.list_notes(Some("bad-token")).await,
            Err(NoteError::Unauthorized(_))
        ));
        assert!(matches!(
            notes.list_notes(None).await,
            Err(NoteError::Unauthorized(_))
        ));

        assert_eq!(store.count_notes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let (notes, auth, store) = services().await;
        let token = auth.authenticate("alice").await.unwrap();

        let result = notes.save_note(request(&token, "", "<p>hi</p>")).await;
        assert!(matches!(result, Err(NoteError::Validation(_))));

        let result = notes
            .save_note(SaveNoteRequest {
                content: None,
                ..request(&token, "example.com", "")
            })
            .await;
        assert!(matches!(result, Err(NoteError::Validation(_))));

        assert_eq!(store.count_notes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_content_is_stored_verbatim() {
        let (notes, auth, _) = services().await;
        let token = auth.authenticate("alice").await.unwrap();

        let id = notes
            .save_note(request(&token, "example.com", "   "))
            .await
            .unwrap();

        let listed = notes.list_notes(Some(&token)).await.unwrap();
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].content, "   ");
    }

    #[tokio::test]
    async fn test_notes_are_scoped_to_their_owner() {
        let (notes, auth, _) = services().await;
        let alice = auth.authenticate("alice").await.unwrap();
        let bob = auth.authenticate("bob").await.unwrap();

        notes
            .save_note(SaveNoteRequest {
                url: Some("https://example.com/a".to_string()),
                ..request(&alice, "example.com", "<p>alice</p>")
            })
            .await
            .unwrap();

        assert!(notes.list_notes(Some(&bob)).await.unwrap().is_empty());

        let listed = notes.list_notes(Some(&alice)).await.unwrap();
        assert_eq!(listed[0].url.as_deref(), Some("https://example.com/a"));
    }
}
