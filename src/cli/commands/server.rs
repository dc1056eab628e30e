use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::cli::api::ApiClient;
use crate::cli::config::{load, load_client_config, save_client_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Show the effective client configuration")]
    Show,

    #[command(about = "Point the client at a server")]
    SetUrl {
        #[arg(help = "Base URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Save a session token")]
    Login {
        #[arg(help = "Bearer token issued by the identity provider")]
        token: String,
    },

    #[command(about = "Forget the saved session token")]
    Logout,

    #[command(about = "Check that the server answers /health")]
    Ping,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Show => {
            let config = load()?;
            let details = json!({
                "server_url": config.server_url,
                "authenticated": config.token.is_some(),
                "current_store": config.current_store,
                "last_ping": config.last_ping,
            });
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&details)?),
                OutputFormat::Text => {
                    println!("Server: {}", config.server_url);
                    println!("Authenticated: {}", if config.token.is_some() { "yes" } else { "no" });
                    match config.current_store {
                        Some(store) => println!("Store: {}", store),
                        None => println!("Store: (none selected)"),
                    }
                }
            }
            Ok(())
        }
        ServerCommands::SetUrl { url } => {
            // Validate before saving
            ApiClient::new(&url, None)?;
            let mut config = load_client_config()?;
            config.server_url = url.clone();
            save_client_config(&config)?;
            output_success(&output_format, &format!("Server set to {}", url), None)
        }
        ServerCommands::Login { token } => {
            let mut config = load_client_config()?;
            config.token = Some(token);
            save_client_config(&config)?;
            output_success(&output_format, "Token saved", None)
        }
        ServerCommands::Logout => {
            let mut config = load_client_config()?;
            config.token = None;
            save_client_config(&config)?;
            output_success(&output_format, "Logged out", None)
        }
        ServerCommands::Ping => {
            let config = load()?;
            let client = ApiClient::new(&config.server_url, None)?;
            if client.ping().await {
                let mut saved = load_client_config()?;
                saved.last_ping = Some(Utc::now());
                save_client_config(&saved)?;
                output_success(&output_format, &format!("{} is up", config.server_url), None)
            } else {
                anyhow::bail!("{} is not responding", config.server_url)
            }
        }
    }
}
