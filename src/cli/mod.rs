pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "duech")]
#[command(about = "DUECh CLI - administration for the Diccionario de uso del español de Chile")]
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
    #[command(about = "Staff account management on the configured store")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Corpus import, export and statistics")]
    Corpus {
        #[command(subcommand)]
        cmd: commands::corpus::CorpusCommands,
    },

    #[command(about = "Print a password hash in the stored format")]
    HashPassword {
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Queries against a running server")]
    Remote {
        #[arg(long, env = "DUECH_SERVER", default_value = "http://localhost:3000", help = "Server base URL")]
        server: String,

        #[command(subcommand)]
        cmd: commands::remote::RemoteCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json && !cli.text {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
        Commands::Corpus { cmd } => commands::corpus::handle(cmd, output_format).await,
        Commands::HashPassword { password } => commands::password::handle(password, output_format),
        Commands::Remote { server, cmd } => commands::remote::handle(&server, cmd, output_format).await,
    }
}
