//! Command-line interface for refactor-review
//!
//! `find` lists candidate files, `analyze` reviews one of them in the
//! terminal, and `serve` runs the upload form.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_settings, Settings};

mod analyze;
mod completions;
mod find;
mod serve;
mod settings;
mod utils;

/// Stream source files to an LLM for a refactor-for-testability review
#[derive(Parser)]
#[command(name = "refactor-review")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (refactor-review.toml or refactor-review.yml)
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List files that can be analyzed
    Find(find::FindArgs),

    /// Pick a file and stream its review to the terminal
    Analyze(analyze::AnalyzeArgs),

    /// Serve the upload form and streamed analysis pages
    Serve(serve::ServeArgs),

    /// Print the effective configuration (credential redacted)
    Config,

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let default_level = match (&cli.command, cli.verbose) {
        (_, true) => Level::DEBUG,
        (Commands::Serve(_), false) => Level::INFO,
        _ => Level::WARN,
    };
    let filter = EnvFilter::from_default_env().add_directive(default_level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Find(args) => find::run(args, &load(cli.config.as_deref())?),
        Commands::Analyze(args) => analyze::run(args, &load(cli.config.as_deref())?),
        Commands::Serve(args) => serve::run(args, &load(cli.config.as_deref())?),
        Commands::Config => settings::run(&load(cli.config.as_deref())?),
        Commands::Completions(args) => completions::run(args),
    }
}

fn load(config: Option<&Path>) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Cannot determine the working directory")?;
    load_settings(&cwd, config)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")
}
