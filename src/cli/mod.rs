pub mod api;
pub mod commands;
pub mod config;
pub mod form;
pub mod listing;
pub mod toast;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::types::Entity;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront CLI - manage stores and their catalog from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Server URL, saved token and connectivity")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Issue a development session token")]
    Token(commands::token::TokenArgs),

    #[command(about = "Create, rename, select and delete stores")]
    Stores {
        #[command(subcommand)]
        cmd: commands::stores::StoreCommands,
    },

    #[command(about = "Billboards of a store")]
    Billboards {
        #[command(subcommand)]
        cmd: commands::catalog::EntityCommands,
    },

    #[command(about = "Categories of a store")]
    Categories {
        #[command(subcommand)]
        cmd: commands::catalog::EntityCommands,
    },

    #[command(about = "Colors of a store")]
    Colors {
        #[command(subcommand)]
        cmd: commands::catalog::EntityCommands,
    },

    #[command(about = "Sizes of a store")]
    Sizes {
        #[command(subcommand)]
        cmd: commands::catalog::EntityCommands,
    },

    #[command(about = "Products of a store")]
    Products {
        #[command(subcommand)]
        cmd: commands::catalog::EntityCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format).await,
        Commands::Stores { cmd } => commands::stores::handle(cmd, output_format).await,
        Commands::Billboards { cmd } => commands::catalog::handle(Entity::Billboard, cmd, output_format).await,
        Commands::Categories { cmd } => commands::catalog::handle(Entity::Category, cmd, output_format).await,
        Commands::Colors { cmd } => commands::catalog::handle(Entity::Color, cmd, output_format).await,
        Commands::Sizes { cmd } => commands::catalog::handle(Entity::Size, cmd, output_format).await,
        Commands::Products { cmd } => commands::catalog::handle(Entity::Product, cmd, output_format).await,
    }
}
