//! stagecrew CLI — the main entry point.
//!
//! Commands:
//! - `run`     — Analyse one text with the classifier → keywords → summarizer team
//! - `demo`    — Run the team over the built-in sample texts
//! - `graph`   — Print the team's workflow as a Mermaid diagram
//! - `config`  — Validate, show, locate, or initialise the config file
//! - `doctor`  — Diagnose config and provider health

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "stagecrew",
    about = "stagecrew — a team of LLM agents that classify, tag, and summarise text",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.stagecrew/config.toml
    #[arg(long, global = true, env = "STAGECREW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a text (argument, --file, or stdin)
    Run {
        /// The text to analyse
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the final record as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Run the team over built-in sample texts
    Demo,

    /// Print the team workflow as a Mermaid diagram
    Graph {
        /// Write the diagram to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose config and provider health
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Check the config file for errors
    Validate,
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results only
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run { text, file, json } => {
            commands::run::run(config_path, text, file, json).await?
        }
        Commands::Demo => commands::demo::run(config_path).await?,
        Commands::Graph { output } => commands::graph::run(config_path, output).await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate(config_path).await?,
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Path => commands::config_cmd::path(config_path).await?,
            ConfigAction::Init { force } => commands::config_cmd::init(config_path, force).await?,
        },
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
