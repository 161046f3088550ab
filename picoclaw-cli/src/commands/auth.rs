//! Auth subcommands for picoclaw CLI

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use picoclaw_models::auth::{CredentialStatus, CredentialStore};

use super::status::load_store;

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Show stored credentials and their lifecycle status
    Status,
}

pub fn run(args: AuthArgs) -> Result<()> {
    match args.command {
        AuthCommand::Status => status(),
    }
}

fn status() -> Result<()> {
    let path = picoclaw_paths::auth_store_path();
    let store = load_store(&path);

    if store.is_empty() {
        println!("No stored credentials.");
        println!();
        println!("Credential store: {}", path.display());
        return Ok(());
    }

    println!("{}", credentials_table(&store, Utc::now()));
    Ok(())
}

/// Table of stored credentials evaluated at `now`.
fn credentials_table(store: &CredentialStore, now: DateTime<Utc>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Provider").fg(Color::Cyan),
        Cell::new("Method").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Expires").fg(Color::Cyan),
    ]);

    for (provider, cred, status) in store.statuses(now) {
        let expires = cred
            .expires_at()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(provider),
            Cell::new(cred.auth_method),
            Cell::new(status).fg(status_color(status)),
            Cell::new(expires),
        ]);
    }

    table
}

fn status_color(status: CredentialStatus) -> Color {
    match status {
        CredentialStatus::Authenticated => Color::Green,
        CredentialStatus::NeedsRefresh => Color::Yellow,
        CredentialStatus::Expired => Color::Red,
    }
}
