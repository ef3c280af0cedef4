//! Save note command handler

use std::sync::Arc;

use crate::client::{NoteSession, Relay};
use crate::config::Config;

use super::attach_client;

pub async fn cmd_save(
    config: &Config,
    domain: &str,
    content: &str,
    url: Option<String>,
) -> anyhow::Result<()> {
    let (_, listener, store) = attach_client(config).await?;
    listener.stop();

    let relay = Arc::new(Relay::new(&config.relay)?);
    let session = NoteSession::new(domain, store, relay);

    session.edit(content).await?;
    let response = session.save(url).await;

    if response.success {
        let note_id = response
            .data
            .as_ref()
            .and_then(|d| d.get("noteId"))
            .and_then(serde_json::Value::as_i64);

        match note_id {
            Some(id) => println!("✓ Saved note #{} for {}", id, domain),
            None => println!("✓ Saved note for {}", domain),
        }
    } else {
        println!(
            "✗ Save failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
