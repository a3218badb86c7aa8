pub mod config;
pub mod crm;
pub mod team;
pub mod user;

use anyhow::{Context, Result};
use colored::Colorize;

use clinic_client::HttpAdminClient;
use clinic_core::{config as client_config, ValidationErrors};

/// Resolve the effective config (flag > env > file) and build the HTTP client.
pub fn connect(base_url: Option<String>) -> Result<HttpAdminClient> {
    let config = client_config::load()
        .context("failed to load ~/.clinic-admin/config.yaml")?
        .with_overrides(base_url, std::env::var(client_config::BASE_URL_ENV).ok());
    tracing::debug!(base_url = %config.base_url, "using clinic API");
    HttpAdminClient::new(&config).context("invalid client configuration")
}

/// Print every failed field, one per line.
pub fn print_validation(errors: &ValidationErrors) {
    for field in &errors.fields {
        eprintln!("  {} {}: {}", "✗".red(), field.field, field.message);
    }
}
