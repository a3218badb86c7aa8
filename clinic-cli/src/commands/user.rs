//! `clinic-admin user show|edit <id>`

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use clinic_core::{EntryId, UserForm};
use clinic_sync::{EntryListSynchronizer, ListScope, SyncError, UserDetailEditor};

use super::{connect, print_validation};

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Show a user's editable details.
    Show {
        /// User id.
        id: String,

        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Change a user's details. Fields not given keep their stored value.
    Edit(EditArgs),
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// User id.
    pub id: String,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone number.
    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub address: Option<String>,
}

impl EditArgs {
    fn apply(self, form: &mut UserForm) {
        let fields = [
            (self.first_name, &mut form.first_name),
            (self.last_name, &mut form.last_name),
            (self.email, &mut form.email),
            (self.contact, &mut form.contact),
            (self.address, &mut form.address),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

pub async fn run(cmd: UserCommand, base_url: Option<String>) -> Result<()> {
    let client = connect(base_url)?;
    match cmd {
        UserCommand::Show { id, json } => {
            let mut editor = UserDetailEditor::new(EntryId::from(id));
            editor
                .load(&client)
                .await
                .with_context(|| format!("failed to load user '{}'", editor.id()))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(editor.form()).context("failed to serialize user")?
                );
            } else {
                print_form(editor.id(), editor.form());
            }
            Ok(())
        }
        UserCommand::Edit(args) => {
            let mut editor = UserDetailEditor::new(EntryId::from(args.id.clone()));
            editor
                .load(&client)
                .await
                .with_context(|| format!("failed to load user '{}'", editor.id()))?;
            args.apply(editor.form_mut());

            let sync = EntryListSynchronizer::new(client, ListScope::Active);
            match editor.submit(&sync).await {
                Ok(_) => {
                    println!("✓ Updated '{}'", editor.id());
                    print_form(editor.id(), editor.form());
                    Ok(())
                }
                Err(SyncError::Validation(errors)) => {
                    print_validation(&errors);
                    bail!("user '{}' was not updated", editor.id())
                }
                Err(err) => {
                    Err(err).with_context(|| format!("failed to update user '{}'", editor.id()))
                }
            }
        }
    }
}

fn print_form(id: &EntryId, form: &UserForm) {
    println!("{}", format!("User {id}").bold());
    println!("  first name: {}", form.first_name);
    println!("  last name:  {}", form.last_name);
    println!("  email:      {}", form.email);
    println!("  contact:    {}", form.contact);
    println!("  address:    {}", form.address);
}
