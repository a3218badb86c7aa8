//! `clinic-admin config init|show`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use clinic_core::config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write ~/.clinic-admin/config.yaml, keeping values not given.
    Init(InitArgs),

    /// Print the effective configuration and where it came from.
    Show,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

pub fn run(cmd: ConfigCommand, base_url: Option<String>) -> Result<()> {
    let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
    match cmd {
        ConfigCommand::Init(args) => init(&home, base_url, args),
        ConfigCommand::Show => show(&home, base_url),
    }
}

fn init(home: &Path, base_url: Option<String>, args: InitArgs) -> Result<()> {
    let mut cfg = config::load_at(home).context("failed to read existing config")?;
    if let Some(url) = base_url {
        cfg.base_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        cfg.timeout_secs = secs;
    }
    cfg.parsed_base_url()
        .with_context(|| format!("refusing to save '{}'", cfg.base_url))?;

    let path = config::save_at(home, &cfg).context("failed to write config")?;
    println!("✓ Saved {}", path.display());
    println!("  base_url:     {}", cfg.base_url);
    println!("  timeout_secs: {}", cfg.timeout_secs);
    Ok(())
}

fn show(home: &Path, base_url: Option<String>) -> Result<()> {
    let path = config::config_path_at(home);
    let file = config::load_at(home).context("failed to read config")?;
    let env = std::env::var(config::BASE_URL_ENV).ok();

    let source = if base_url.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        "--base-url"
    } else if env.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        config::BASE_URL_ENV
    } else if path.exists() {
        "config file"
    } else {
        "default"
    };
    let effective = file.with_overrides(base_url, env);

    println!("config file:  {}", path.display());
    println!("base_url:     {} ({source})", effective.base_url);
    println!("timeout_secs: {}", effective.timeout_secs);
    Ok(())
}
