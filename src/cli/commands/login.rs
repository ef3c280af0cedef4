//! Dashboard login/logout command handlers

use std::time::Duration;

use crate::client::DashboardClient;
use crate::config::Config;

use super::attach_client;

pub async fn cmd_login(config: &Config, username: &str) -> anyhow::Result<()> {
    let dashboard = DashboardClient::new(&config.relay)?;
    let token = dashboard.login(username).await?;

    let (bridge, listener, store) = attach_client(config).await?;
    let mut synced = listener.synced();

    bridge.publish(&token).await?;

    let delivered = tokio::time::timeout(
        Duration::from_secs(2),
        synced.wait_for(|t| t.as_deref() == Some(token.as_str())),
    )
    .await
    .is_ok_and(|r| r.is_ok());
    listener.stop();

    println!("✓ Logged in as {}", username.trim());
    println!("  Token: {}", token);

    if delivered {
        println!("  Extension store synced: {}", store.token_key());
    } else {
        println!("  Extension not synced yet; it will pick the token up on next start.");
    }

    Ok(())
}

pub async fn cmd_logout(config: &Config) -> anyhow::Result<()> {
    let (bridge, listener, _) = attach_client(config).await?;
    listener.stop();

    bridge.clear().await?;
    println!("✓ Logged out of the dashboard.");
    println!("  The extension keeps its token until you clear it manually.");

    Ok(())
}
