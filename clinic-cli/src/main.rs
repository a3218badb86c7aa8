//! clinic-admin: command-line front end for the clinic admin dashboard.
//!
//! # Usage
//!
//! ```text
//! clinic-admin team list [--archived] [--json]
//! clinic-admin team cycle-role <id> [--archived]
//! clinic-admin team archive <id> [--yes] [--archived]
//! clinic-admin user show <id> [--json]
//! clinic-admin user edit <id> [--first-name ..] [--last-name ..] [--email ..] [--contact ..] [--address ..]
//! clinic-admin crm show [--json]
//! clinic-admin crm update [--color ..] [--instagram ..] [--phone ..] [--address ..] [--email ..] [--logo <path>]
//! clinic-admin config init [--base-url <url>] [--timeout-secs <n>]
//! clinic-admin config show
//! ```
//!
//! Every remote command accepts `--base-url`, which beats `CLINIC_ADMIN_BASE_URL`,
//! which beats `~/.clinic-admin/config.yaml`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    config::ConfigCommand, crm::CrmCommand, team::TeamCommand, user::UserCommand,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "clinic-admin",
    version,
    about = "Manage clinic staff, patients and CRM settings from the terminal",
    long_about = None,
)]
struct Cli {
    /// Clinic API base URL (e.g. http://127.0.0.1:1129/api).
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Raise log verbosity on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List entries, cycle roles, archive entries.
    Team {
        #[command(subcommand)]
        command: TeamCommand,
    },

    /// Show or edit a single user's details.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Show or update CRM branding and contact settings.
    Crm {
        #[command(subcommand)]
        command: CrmCommand,
    },

    /// Manage the local client configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let base_url = cli.base_url;
    match cli.command {
        Commands::Team { command } => commands::team::run(command, base_url).await,
        Commands::User { command } => commands::user::run(command, base_url).await,
        Commands::Crm { command } => commands::crm::run(command, base_url).await,
        Commands::Config { command } => commands::config::run(command, base_url),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
