//! Encyclopedia CLI - build, inspect and compose forests and relations

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod input;
mod output;

use commands::{completions, forest, relation};
use config::{config_file_path, Config};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "encyclopedia")]
#[command(author, version, about = "Relations and forests of aliased nodes")]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Config file
    #[arg(short, long, global = true, env = "ENCYCLOPEDIA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and inspect forests
    Forest(forest::ForestArgs),
    /// Build and compose relations
    Relation(relation::RelationArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with the resolved configuration
pub struct AppContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load(&cli.config_path())?;
        let format = cli.format.unwrap_or(config.format);
        Ok(Self { config, format })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting encyclopedia CLI");

    match &cli.command {
        Commands::Forest(args) => forest::run(args, &AppContext::new(&cli)?)?,
        Commands::Relation(args) => relation::run(args, &AppContext::new(&cli)?)?,
        Commands::Config(args) => commands::config::run(args, &cli.config_path())?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
