//! Widget-side note session for one site.
//!
//! Holds no state of its own: the draft lives in the [`TokenStore`] and saves
//! go through the [`Relay`]. DOM wiring is the caller's business.

use std::sync::Arc;

use super::relay::{Relay, RelayMessage, RelayResponse};
use super::token_store::{StoreError, TokenStore};

/// Editor content shown when a site has no draft yet.
pub const DRAFT_PLACEHOLDER: &str = "Write a note...";

pub struct NoteSession {
    domain: String,
    store: TokenStore,
    relay: Arc<Relay>,
}

impl NoteSession {
    pub fn new(domain: impl Into<String>, store: TokenStore, relay: Arc<Relay>) -> Self {
        Self {
            domain: domain.into(),
            store,
            relay,
        }
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub async fn draft(&self) -> String {
        self.store.draft(&self.domain, DRAFT_PLACEHOLDER).await
    }

    pub async fn edit(&self, html: &str) -> Result<(), StoreError> {
        self.store.set_draft(&self.domain, html).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.set_draft(&self.domain, "").await
    }

    /// Sends the current draft to the server as a new note.
    pub async fn save(&self, url: Option<String>) -> RelayResponse {
        let Some(token) = self.store.token().await else {
            return RelayResponse::failure("Not connected: log in on the dashboard first");
        };

        let content = self.draft().await;
        if content.trim().is_empty() || content == DRAFT_PLACEHOLDER {
            return RelayResponse::failure("Nothing to save");
        }

        self.relay
            .handle(RelayMessage::SaveNote {
                token,
                domain: self.domain.clone(),
                content,
                url,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::token_store::MemoryStore;
    use crate::config::RelayConfig;

    fn session() -> NoteSession {
        let store = TokenStore::new(Arc::new(MemoryStore::new()), "noted");
        let relay = Arc::new(Relay::new(&RelayConfig::default()).unwrap());
        NoteSession::new("example.com", store, relay)
    }

    #[tokio::test]
    async fn test_draft_defaults_to_placeholder() {
        let session = session();
        assert_eq!(session.draft().await, DRAFT_PLACEHOLDER);

        session.edit("<b>hello</b>").await.unwrap();
        assert_eq!(session.draft().await, "<b>hello</b>");

        session.clear().await.unwrap();
        assert_eq!(session.draft().await, "");
    }

    #[tokio::test]
    async fn test_save_without_token_fails_locally() {
        let session = session();
        session.edit("<b>hello</b>").await.unwrap();

        let response = session.save(None).await;
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("Not connected"));
    }
}
