pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "artika")]
#[command(about = "Artika CLI - database setup and admin bootstrap")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create any missing tables")]
    Migrate,

    #[command(about = "Insert sample categories, portfolio projects and default settings")]
    Seed,

    #[command(about = "Create an admin account")]
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, help = "Promote the account to admin if the email is already registered")]
        promote: bool,
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
        Commands::Migrate => commands::db::migrate(output_format).await,
        Commands::Seed => commands::db::seed(output_format).await,
        Commands::CreateAdmin {
            email,
            password,
            name,
            promote,
        } => {
            let request = commands::admin::AdminRequest {
                email,
                password,
                name,
                promote,
            };
            commands::admin::handle(request, output_format).await
        }
    }
}
