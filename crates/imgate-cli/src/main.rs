use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "imgate")]
#[command(about = "imgate CLI - inspect transports and gateway configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the transport registry
    Transports {
        #[command(subcommand)]
        action: TransportsAction,
    },
    /// Print the disco identities the gateway advertises
    Disco {
        /// Config file (defaults to the platform config directory)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Manage the gateway configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum TransportsAction {
    /// List every known transport
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one transport by symbolic name
    Show { name: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Check {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Write a default config file
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Transports { action } => match action {
            TransportsAction::List { json } => commands::transports::list(json)?,
            TransportsAction::Show { name } => commands::transports::show(&name)?,
        },
        Commands::Disco { config, json } => commands::disco::run(config, json)?,
        Commands::Config { action } => match action {
            ConfigAction::Check { path } => commands::config::check(path)?,
            ConfigAction::Init { path, force } => commands::config::init(path, force)?,
        },
    }

    Ok(())
}
