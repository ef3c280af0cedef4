//! Connection status command handler

use crate::client::{DashboardClient, SyncStatus, sync_status};
use crate::config::Config;

use super::attach_client;

pub async fn cmd_status(config: &Config) -> anyhow::Result<()> {
    let (_, listener, store) = attach_client(config).await?;
    listener.stop();

    match sync_status(&store).await {
        SyncStatus::Connected => println!("✨ Auto-Sync Connected"),
        SyncStatus::NotConnected => println!("❌ Not Connected"),
    }

    let dashboard = DashboardClient::new(&config.relay)?;
    match dashboard.ping().await {
        Ok(status) => println!("  Server: {} ({})", config.relay.server_url, status.status),
        Err(e) => println!("  Server: {} unreachable: {:#}", config.relay.server_url, e),
    }
    Ok(())
}
