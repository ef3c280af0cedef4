mod login;
mod notes;
mod save;
mod status;

pub use login::{cmd_login, cmd_logout};
pub use notes::cmd_notes;
pub use save::cmd_save;
pub use status::cmd_status;

use std::sync::Arc;

use crate::client::{FileStore, SyncBridge, SyncListener, TokenStore};
use crate::config::Config;

/// Opens the page store and the extension store and wires a bridge between
/// them. The listener's fallback read has already run when this returns.
pub(crate) async fn attach_client(
    config: &Config,
) -> anyhow::Result<(SyncBridge, SyncListener, TokenStore)> {
    let page = Arc::new(FileStore::open(&config.client.page_store_path).await?);
    let extension = Arc::new(FileStore::open(&config.client.store_path).await?);

    let bridge = SyncBridge::new(&config.client.app_name, &config.client.sync_event, page);
    let store = TokenStore::new(extension, &config.client.app_name);
    let listener = SyncListener::attach(&bridge, store.clone()).await;

    Ok((bridge, listener, store))
}
