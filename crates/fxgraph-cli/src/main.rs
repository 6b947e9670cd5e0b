//! fxgraph CLI - inspect, edit and compile effect graphs from the shell.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fxgraph_config::Settings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fxgraph")]
#[command(author, version, about = "fxgraph effect graph CLI", long_about = None)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Override the state directory used for presets
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show effect kinds and their parameters
    Schema(commands::schema::SchemaArgs),

    /// Check a graph payload against the contract
    Validate(commands::validate::ValidateArgs),

    /// Compile a graph payload into the engine representation
    Compile(commands::compile::CompileArgs),

    /// Encode a graph payload into parameter bank writes
    Bank(commands::bank::BankArgs),

    /// Apply edit operations to a graph and print the result
    Edit(commands::edit::EditArgs),

    /// List and manage stored presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.settings, cli.state_dir)?;

    match cli.command {
        Commands::Schema(args) => commands::schema::run(args),
        Commands::Validate(args) => commands::validate::run(args, &settings),
        Commands::Compile(args) => commands::compile::run(args),
        Commands::Bank(args) => commands::bank::run(args),
        Commands::Edit(args) => commands::edit::run(args, &settings),
        Commands::Presets(args) => commands::presets::run(args, &settings),
    }
}

fn load_settings(path: Option<PathBuf>, state_dir: Option<PathBuf>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };
    if state_dir.is_some() {
        settings.state_dir = state_dir;
    }
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}
