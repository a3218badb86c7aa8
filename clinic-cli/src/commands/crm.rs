//! `clinic-admin crm show|update`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use clinic_core::{CrmSettingsForm, LogoField, LogoUpload};
use clinic_sync::{CrmSettingsEditor, SettingsReport, SyncError};

use super::{connect, print_validation};

#[derive(Subcommand, Debug)]
pub enum CrmCommand {
    /// Show the current CRM settings.
    Show {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Change CRM settings. Fields not given keep their stored value.
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Primary brand color (e.g. "#4cceac").
    #[arg(long)]
    pub color: Option<String>,

    /// Instagram profile URL.
    #[arg(long)]
    pub instagram: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Image file to upload as the new logo.
    #[arg(long, value_name = "PATH")]
    pub logo: Option<PathBuf>,
}

impl UpdateArgs {
    fn apply(self, form: &mut CrmSettingsForm) {
        let fields = [
            (self.color, &mut form.primary_color),
            (self.instagram, &mut form.instagram),
            (self.phone, &mut form.phone),
            (self.address, &mut form.address),
            (self.email, &mut form.email),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

pub async fn run(cmd: CrmCommand, base_url: Option<String>) -> Result<()> {
    let mut editor = CrmSettingsEditor::new(connect(base_url)?);
    editor.load().await.context("failed to load CRM settings")?;

    match cmd {
        CrmCommand::Show { json } => {
            if json {
                let form = editor.form();
                let payload = serde_json::json!({
                    "color": form.primary_color,
                    "logoImage": logo_url(&form.logo),
                    "instagramUrl": form.instagram,
                    "phoneNumber": form.phone,
                    "address": form.address,
                    "email": form.email,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload).context("failed to serialize settings")?
                );
            } else {
                print_form(editor.form());
            }
            Ok(())
        }
        CrmCommand::Update(mut args) => {
            if let Some(path) = args.logo.take() {
                editor.choose_logo(read_logo(path)?);
            }
            args.apply(editor.form_mut());

            match editor.submit().await {
                Ok(report) => finish(&report, editor.form()),
                Err(SyncError::Validation(errors)) => {
                    print_validation(&errors);
                    bail!("CRM settings were not updated")
                }
                Err(err) => Err(err).context("failed to update CRM settings"),
            }
        }
    }
}

fn read_logo(path: PathBuf) -> Result<LogoUpload> {
    let bytes = std::fs::read(&path)
        .with_context(|| format!("cannot read logo file '{}'", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' is not a file path", path.display()))?;
    Ok(LogoUpload { file_name, bytes })
}

fn finish(report: &SettingsReport, form: &CrmSettingsForm) -> Result<()> {
    if let Some(Err(err)) = &report.logo {
        eprintln!("{} logo upload failed: {err}", "✗".red());
    }
    if let Err(err) = &report.settings {
        bail!("failed to update CRM settings: {err}");
    }
    println!("✓ CRM settings updated");
    print_form(form);
    if !report.is_success() {
        bail!("CRM settings saved but the logo was not uploaded");
    }
    Ok(())
}

fn logo_url(logo: &LogoField) -> Option<&str> {
    match logo {
        LogoField::Existing(url) => Some(url),
        _ => None,
    }
}

fn print_form(form: &CrmSettingsForm) {
    println!("{}", "CRM settings".bold());
    println!("  color:     {}", form.primary_color);
    println!("  logo:      {}", logo_url(&form.logo).unwrap_or("(none)"));
    println!("  instagram: {}", form.instagram);
    println!("  phone:     {}", form.phone);
    println!("  address:   {}", form.address);
    println!("  email:     {}", form.email);
}
