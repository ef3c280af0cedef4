//! CLI module - Command-line interface for Noted
//!
//! `serve` runs the notes server; the other commands play the dashboard and
//! extension roles against a running server.

mod commands;

use clap::{Parser, Subcommand};

/// Noted - page notes synced to your account
#[derive(Parser)]
#[command(name = "noted")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the notes server
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Log in on the dashboard and sync the token to the extension store
    Login {
        /// Username; created on first login
        username: String,
    },

    /// Log out of the dashboard (the extension keeps its token)
    Logout,

    /// List saved notes, newest first
    #[command(alias = "ls")]
    Notes,

    /// Save a note for a site through the relay
    Save {
        /// Site hostname, e.g. example.com
        domain: String,
        /// Note content (HTML fragment)
        content: String,
        /// Page URL the note was written on
        #[arg(long)]
        url: Option<String>,
    },

    /// Show whether the extension store holds a token
    Status,
}

pub use commands::*;
