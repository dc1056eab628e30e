use clap::Subcommand;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cli::form::{Form, FormSpec};
use crate::cli::listing::Table;
use crate::cli::toast::Toast;
use crate::cli::utils::{collect_values, confirm, output_record, parse_assignment};
use crate::cli::OutputFormat;
use crate::types::Entity;

use super::{connect, form_failure, report};

#[derive(Subcommand)]
pub enum EntityCommands {
    #[command(about = "List the store's records, newest first")]
    List {
        #[arg(long, help = "Store id (defaults to the selected store)")]
        store: Option<Uuid>,
        #[arg(long, help = "Include archived products (products only)")]
        include_archived: bool,
        #[arg(long, help = "Only featured products (products only)")]
        featured: bool,
        #[arg(long, help = "Filter products by category id")]
        category: Option<Uuid>,
    },

    #[command(about = "Show one record")]
    Show {
        #[arg(help = "Record ID")]
        id: Uuid,
        #[arg(long)]
        store: Option<Uuid>,
    },

    #[command(about = "Create a record, or edit one with --id")]
    Save {
        #[arg(long, help = "Record to edit; omit to create")]
        id: Option<Uuid>,
        #[arg(long)]
        store: Option<Uuid>,
        #[arg(long = "set", value_parser = parse_assignment, help = "Field as string: name=Shirts")]
        set: Vec<(String, String)>,
        #[arg(long = "set-json", value_parser = parse_assignment, help = "Field as JSON: price=12.5")]
        set_json: Vec<(String, String)>,
    },

    #[command(about = "Delete a record after confirmation")]
    Delete {
        #[arg(help = "Record ID")]
        id: Uuid,
        #[arg(long)]
        store: Option<Uuid>,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Print a record id for pasting elsewhere")]
    CopyId {
        #[arg(help = "Record ID")]
        id: Uuid,
    },
}

/// Query string for the product listing
/// Toast for `copy-id`, which writes the id to stdout
fn id_printed(entity: Entity) -> Toast {
    Toast::success(format!("{} ID printed.", entity.title()))
}

pub fn product_query(include_archived: bool, featured: bool, category: Option<Uuid>) -> String {
    let mut params = Vec::new();
    if include_archived {
        params.push("includeArchived=true".to_string());
    }
    if featured {
        params.push("isFeatured=true".to_string());
    }
    if let Some(category) = category {
        params.push(format!("categoryId={}", category));
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

pub async fn handle(entity: Entity, cmd: EntityCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (config, client) = connect()?;

    match cmd {
        EntityCommands::List {
            store,
            include_archived,
            featured,
            category,
        } => {
            let store_id = config.require_store(store)?;
            let mut path = format!("/api/{}/{}", store_id, entity.segment());
            if entity == Entity::Product {
                path.push_str(&product_query(include_archived, featured, category));
            }

            let records = match client.get(&path).await? {
                Value::Array(records) => records,
                other => anyhow::bail!("expected a list, got {}", other),
            };
            let table = Table::for_entity(entity, &records);
            match output_format {
                OutputFormat::Json => output_record(&json!({ "table": table.to_json(), "records": records }))?,
                OutputFormat::Text => println!("{}", table.render_text()),
            }
            Ok(())
        }
        EntityCommands::Show { id, store } => {
            let store_id = config.require_store(store)?;
            let record = client.get(&format!("/api/{}/{}/{}", store_id, entity.segment(), id)).await?;
            output_record(&record)
        }
        EntityCommands::Save {
            id,
            store,
            set,
            set_json,
        } => {
            let store_id = config.require_store(store)?;
            let spec = FormSpec::entity(entity, store_id);

            let initial = match id {
                Some(id) => Some(client.get(&spec.item_path(id)).await?),
                None => None,
            };
            let mut form = Form::new(spec, initial).map_err(|e| anyhow::anyhow!(e))?;
            for (field, value) in collect_values(set, set_json)? {
                form.set(field, value);
            }

            if let OutputFormat::Text = output_format {
                println!("{} ({})", form.heading(), form.action_label());
            }
            let outcome = form
                .submit(&client)
                .await
                .map_err(|e| form_failure(&form.heading(), e))?;
            report(&outcome, &output_format)?;
            if let (OutputFormat::Json, Some(data)) = (&output_format, &outcome.data) {
                output_record(data)?;
            }
            Ok(())
        }
        EntityCommands::Delete { id, store, yes } => {
            let store_id = config.require_store(store)?;
            let form = Form::new(FormSpec::entity(entity, store_id), Some(json!({ "id": id.to_string() })))
                .map_err(|e| anyhow::anyhow!(e))?;

            let question = format!("Delete {} {}? This action cannot be undone.", entity.noun(), id);
            let outcome = form
                .delete(&client, || yes || confirm(&question).unwrap_or(false))
                .await
                .map_err(|e| form_failure(&form.heading(), e))?;

            match outcome {
                Some(outcome) => report(&outcome, &output_format),
                None => {
                    println!("Cancelled.");
                    Ok(())
                }
            }
        }
        EntityCommands::CopyId { id } => {
            println!("{}", id);
            id_printed(entity).render(&output_format)
        }
    }
}
