//! Token hand-off from the dashboard into the extension's store.
//!
//! The dashboard cannot write the extension store directly. When it obtains
//! a token it does two things:
//!
//! 1. mirrors the token into the page-local store under `<app>_token`;
//! 2. broadcasts a single-shot [`SyncEvent`].
//!
//! A [`SyncListener`] with access to the extension store persists every event
//! it sees. The broadcast is fire-and-forget: if nobody is subscribed yet the
//! event is simply gone. To cover that (and page reloads, where no event fires
//! at all) the listener reads the page-local key once when it attaches.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::token_store::{KeyValueStore, StoreError, TokenStore};

const EVENT_BUFFER: usize = 16;

/// Payload of the sync notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    pub token: String,
}

/// Dashboard side of the bridge.
#[derive(Clone)]
pub struct SyncBridge {
    event_name: String,
    token_key: String,
    page_store: Arc<dyn KeyValueStore>,
    sender: broadcast::Sender<SyncEvent>,
}

impl SyncBridge {
    pub fn new(app_name: &str, event_name: &str, page_store: Arc<dyn KeyValueStore>) -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);

        Self {
            event_name: event_name.to_string(),
            token_key: format!("{app_name}_token"),
            page_store,
            sender,
        }
    }

    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    #[must_use]
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// Mirrors `token` into the page store, then broadcasts it.
    ///
    /// Returns whether any listener was attached to receive the event. `false`
    /// is not an error: the next listener to attach picks the token up from
    /// the page store.
    pub async fn publish(&self, token: &str) -> Result<bool, StoreError> {
        self.page_store.set(&self.token_key, token).await?;

        let delivered = self
            .sender
            .send(SyncEvent {
                token: token.to_string(),
            })
            .is_ok();

        if delivered {
            debug!(event = %self.event_name, "Token sync event dispatched");
        } else {
            debug!(
                event = %self.event_name,
                "No sync listener attached; token left in page store"
            );
        }

        Ok(delivered)
    }

    /// Dashboard logout. Only the page copy is removed; the extension keeps
    /// whatever token it already stored.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.page_store.remove(&self.token_key).await
    }

    fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}

/// Extension side of the bridge.
pub struct SyncListener {
    handle: JoinHandle<()>,
    synced: watch::Receiver<Option<String>>,
}

impl SyncListener {
    /// Starts listening and runs the page-store fallback read.
    ///
    /// The subscription is taken before the fallback read so a token published
    /// in between is still seen by the event loop.
    pub async fn attach(bridge: &SyncBridge, store: TokenStore) -> Self {
        let mut events = bridge.subscribe();
        let (synced_tx, synced) = watch::channel(None);

        if let Some(token) = bridge.page_store.get(&bridge.token_key).await
            && !token.is_empty()
        {
            info!("Recovered token from page store");
            persist(&store, &synced_tx, &token).await;
        }

        let event_name = bridge.event_name.clone();
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => persist(&store, &synced_tx, &event.token).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(event = %event_name, skipped, "Sync listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self { handle, synced }
    }

    /// Last token this listener wrote into the extension store.
    #[must_use]
    pub fn synced(&self) -> watch::Receiver<Option<String>> {
        self.synced.clone()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

async fn persist(store: &TokenStore, synced: &watch::Sender<Option<String>>, token: &str) {
    match store.set_token(token).await {
        Ok(()) => {
            synced.send_replace(Some(token.to_string()));
        }
        Err(e) => warn!("Failed to persist synced token: {}", e),
    }
}

/// Connection state shown by the extension popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Connected,
    NotConnected,
}

pub async fn sync_status(store: &TokenStore) -> SyncStatus {
    if store.token().await.is_some() {
        SyncStatus::Connected
    } else {
        SyncStatus::NotConnected
    }
}
