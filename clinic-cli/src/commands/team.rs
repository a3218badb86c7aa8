//! `clinic-admin team list|cycle-role|archive`

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use clinic_client::HttpAdminClient;
use clinic_core::{AccessLevel, Entry, EntryId};
use clinic_sync::{ArchiveConfirmationFlow, EntryListSynchronizer, ListScope, Reconciliation};

use super::connect;

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// List entries with their access level.
    List(ListArgs),

    /// Advance an entry's role: admin → manager → user → admin.
    CycleRole(CycleRoleArgs),

    /// Archive an entry after confirmation.
    Archive(ArchiveArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List archived entries instead of active ones.
    #[arg(long)]
    pub archived: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CycleRoleArgs {
    /// Entry id.
    pub id: String,

    /// Look the entry up in the archived list.
    #[arg(long)]
    pub archived: bool,
}

#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Entry id.
    pub id: String,

    /// Look the entry up in the archived list.
    #[arg(long)]
    pub archived: bool,

    /// Skip the interactive confirmation.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn run(cmd: TeamCommand, base_url: Option<String>) -> Result<()> {
    let client = connect(base_url)?;
    match cmd {
        TeamCommand::List(args) => list(client, scope_for(args.archived), args.json).await,
        TeamCommand::CycleRole(args) => {
            cycle_role(client, scope_for(args.archived), EntryId::from(args.id)).await
        }
        TeamCommand::Archive(args) => archive(client, args).await,
    }
}

async fn loaded(
    client: HttpAdminClient,
    scope: ListScope,
) -> Result<EntryListSynchronizer<HttpAdminClient>> {
    EntryListSynchronizer::load(client, scope)
        .await
        .with_context(|| format!("failed to load the {} list", scope_label(scope)))
}

fn scope_for(archived: bool) -> ListScope {
    if archived {
        ListScope::Archived
    } else {
        ListScope::Active
    }
}

async fn list(client: HttpAdminClient, scope: ListScope, json: bool) -> Result<()> {
    let sync = loaded(client, scope).await?;
    let snapshot = sync.snapshot().await;

    if json {
        let payload = ListJson {
            scope: scope_label(sync.scope()),
            refreshed_at: snapshot.refreshed_at(),
            entries: snapshot.entries(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to serialize entry list")?
        );
        return Ok(());
    }

    print_table(sync.scope(), snapshot.entries(), snapshot.refreshed_at());
    Ok(())
}

async fn cycle_role(client: HttpAdminClient, scope: ListScope, id: EntryId) -> Result<()> {
    let sync = loaded(client, scope).await?;
    let before = sync.snapshot().await.get(&id).map(|e| e.access_level);

    let outcome = sync
        .request_role_cycle(&id)
        .await
        .with_context(|| format!("failed to change role of '{id}'"))?;

    let after = sync.snapshot().await.get(&id).map(|e| e.access_level);
    match (before, after, outcome) {
        (_, _, Reconciliation::Ignored { .. }) => {
            println!("✓ Role change sent for '{id}' (not in the current list)");
        }
        (Some(from), Some(to), _) => {
            println!("✓ {id}: {} → {}", role_label(from), role_label(to));
        }
        (_, Some(to), _) => println!("✓ {id} is now {}", role_label(to)),
        (_, None, _) => println!("✓ Role changed; '{id}' is no longer listed"),
    }
    Ok(())
}

async fn archive(client: HttpAdminClient, args: ArchiveArgs) -> Result<()> {
    let sync = loaded(client, scope_for(args.archived)).await?;
    let id = EntryId::from(args.id);
    let label = sync
        .snapshot()
        .await
        .get(&id)
        .map(|e| display_name(e).to_string())
        .unwrap_or_else(|| id.to_string());

    let mut flow = ArchiveConfirmationFlow::new();
    flow.open(id.clone());

    if !args.yes && !confirmed(&format!("Archive {label}?"))? {
        flow.cancel();
        println!("Cancelled; nothing was archived.");
        return Ok(());
    }

    flow.confirm(&sync)
        .await
        .with_context(|| format!("failed to archive '{id}'"))?;
    println!(
        "✓ Archived '{label}' ({} entries remain)",
        sync.snapshot().await.len()
    );
    Ok(())
}

/// `[y/N]` prompt on stdout; anything but `y`/`yes` declines.
fn confirmed(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush().context("failed to write prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ListJson<'a> {
    scope: &'static str,
    refreshed_at: Option<DateTime<Utc>>,
    entries: &'a [Entry],
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "phone")]
    phone: String,
    #[tabled(rename = "email")]
    email: String,
    #[tabled(rename = "address")]
    address: String,
    #[tabled(rename = "access")]
    access: String,
}

fn print_table(scope: ListScope, entries: &[Entry], refreshed_at: Option<DateTime<Utc>>) {
    let when = refreshed_at
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!(
        "{} | {} entries | refreshed {}",
        scope_label(scope).to_uppercase().bold(),
        entries.len(),
        when
    );

    if entries.is_empty() {
        println!("No entries.");
        return;
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| EntryRow {
            id: e.id.to_string(),
            name: display_name(e).to_string(),
            phone: e.phone.clone(),
            email: e.email.clone(),
            address: e.address.clone(),
            access: role_label(e.access_level),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn display_name(entry: &Entry) -> &str {
    if entry.full_name.is_empty() {
        "(unnamed)"
    } else {
        &entry.full_name
    }
}

fn role_label(level: AccessLevel) -> String {
    match level {
        AccessLevel::Admin => "● admin".green().to_string(),
        AccessLevel::Manager => "● manager".blue().to_string(),
        AccessLevel::User => "● user".bright_black().to_string(),
    }
}

fn scope_label(scope: ListScope) -> &'static str {
    match scope {
        ListScope::Active => "active",
        ListScope::Archived => "archived",
    }
}
