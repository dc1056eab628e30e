use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cli::config::save_client_config;
use crate::cli::form::{Form, FormSpec};
use crate::cli::listing::format_date;
use crate::cli::utils::{confirm, output_record, output_success};
use crate::cli::OutputFormat;

use super::{connect, form_failure, report};

#[derive(Subcommand)]
pub enum StoreCommands {
    #[command(about = "List your stores")]
    List,

    #[command(about = "Create a store")]
    Create {
        #[arg(help = "Store name")]
        name: String,
        #[arg(long, help = "Select the new store for later commands")]
        select: bool,
    },

    #[command(about = "Show one of your stores")]
    Show {
        #[arg(help = "Store ID (defaults to the selected store)")]
        id: Option<Uuid>,
    },

    #[command(about = "Rename a store (settings)")]
    Rename {
        #[arg(help = "Store ID")]
        id: Uuid,
        #[arg(help = "New name")]
        name: String,
    },

    #[command(about = "Delete a store; it must not have any catalog rows left")]
    Delete {
        #[arg(help = "Store ID")]
        id: Uuid,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Select the store used when --store is omitted")]
    Use {
        #[arg(help = "Store ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: StoreCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (mut config, client) = connect()?;

    match cmd {
        StoreCommands::List => {
            let stores = client.get("/api/stores").await?;
            match output_format {
                OutputFormat::Json => output_record(&stores),
                OutputFormat::Text => {
                    let stores = stores.as_array().cloned().unwrap_or_default();
                    if stores.is_empty() {
                        println!("No stores yet. Create one with `storefront stores create <name>`.");
                    }
                    for store in &stores {
                        let id = store.get("id").and_then(Value::as_str).unwrap_or_default();
                        let marker = if config.current_store.map(|c| c.to_string()).as_deref() == Some(id) {
                            "*"
                        } else {
                            " "
                        };
                        let created = store
                            .get("createdAt")
                            .and_then(Value::as_str)
                            .and_then(|raw| raw.parse::<DateTime<Utc>>().ok())
                            .map(|date| format_date(&date))
                            .unwrap_or_default();
                        println!(
                            "{} {}  {}  {}",
                            marker,
                            id,
                            store.get("name").and_then(Value::as_str).unwrap_or_default(),
                            created
                        );
                    }
                    Ok(())
                }
            }
        }
        StoreCommands::Create { name, select } => {
            let mut form = Form::new(FormSpec::new_store(), None).map_err(|e| anyhow::anyhow!(e))?;
            form.set("name", json!(name));
            let outcome = form
                .submit(&client)
                .await
                .map_err(|e| form_failure(&form.heading(), e))?;
            report(&outcome, &output_format)?;

            let created_id = outcome
                .data
                .as_ref()
                .and_then(|data| data.get("id"))
                .and_then(Value::as_str)
                .and_then(|id| Uuid::parse_str(id).ok());
            if let (true, Some(id)) = (select, created_id) {
                config.current_store = Some(id);
                save_client_config(&config)?;
            }
            Ok(())
        }
        StoreCommands::Show { id } => {
            let store_id = config.require_store(id)?;
            let store = client.get(&format!("/api/stores/{}", store_id)).await?;
            output_record(&store)
        }
        StoreCommands::Rename { id, name } => {
            let store = client.get(&format!("/api/stores/{}", id)).await?;
            let mut form = Form::new(FormSpec::store_settings(), Some(store)).map_err(|e| anyhow::anyhow!(e))?;
            form.set("name", json!(name));
            let outcome = form
                .submit(&client)
                .await
                .map_err(|e| form_failure(&form.heading(), e))?;
            report(&outcome, &output_format)
        }
        StoreCommands::Delete { id, yes } => {
            let form = Form::new(FormSpec::store_settings(), Some(json!({ "id": id.to_string() })))
                .map_err(|e| anyhow::anyhow!(e))?;
            let question = format!("Delete store {}? This action cannot be undone.", id);
            let outcome = form
                .delete(&client, || yes || confirm(&question).unwrap_or(false))
                .await
                .map_err(|e| form_failure(&form.heading(), e))?;

            match outcome {
                Some(outcome) => {
                    if !outcome.toast.is_error() && config.current_store == Some(id) {
                        config.current_store = None;
                        save_client_config(&config)?;
                    }
                    report(&outcome, &output_format)
                }
                None => {
                    println!("Cancelled.");
                    Ok(())
                }
            }
        }
        StoreCommands::Use { id } => {
            // Only owned stores resolve; anything else is a 403
            let store = client.get(&format!("/api/stores/{}", id)).await?;
            config.current_store = Some(id);
            save_client_config(&config)?;
            let name = store.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
            output_success(&output_format, &format!("Using store {} ({})", name, id), Some(store))
        }
    }
}
