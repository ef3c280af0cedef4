//! List notes command handler

use crate::client::{DashboardClient, TokenRejected};
use crate::config::Config;

use super::attach_client;

pub async fn cmd_notes(config: &Config) -> anyhow::Result<()> {
    let (bridge, listener, store) = attach_client(config).await?;
    listener.stop();

    let Some(token) = store.token().await else {
        println!("Not connected.");
        println!("Log in with: noted login <username>");
        return Ok(());
    };

    let dashboard = DashboardClient::new(&config.relay)?;
    let notes = match dashboard.fetch_notes(&token).await {
        Ok(notes) => notes,
        Err(e) if e.downcast_ref::<TokenRejected>().is_some() => {
            // A rejected token is useless to both sides
            bridge.clear().await?;
            store.clear_token().await?;

            println!("Session expired; stored token removed.");
            println!("Log in with: noted login <username>");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if notes.is_empty() {
        println!("No notes saved yet.");
        return Ok(());
    }

    println!("Your Notes ({} total)", notes.len());
    println!("{:-<70}", "");

    for note in notes {
        println!("#{} {} [{}]", note.id, note.domain, note.timestamp);
        if let Some(url) = &note.url {
            println!("  {}", url);
        }
        println!("  {}", note.content);
        println!();
    }

    Ok(())
}
