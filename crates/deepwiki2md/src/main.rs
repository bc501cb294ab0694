//! deepwiki2md CLI - DeepWiki to Markdown scraper.
//!
//! Provides commands for:
//! - `scrape`: Scrape one or more DeepWiki libraries into Markdown files
//! - `convert`: Convert a saved, already-rendered page to Markdown

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, ScrapeArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// deepwiki2md - DeepWiki to Markdown scraper.
#[derive(Parser)]
#[command(name = "deepwiki2md", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape DeepWiki libraries into Markdown files.
    Scrape(ScrapeArgs),
    /// Convert a saved HTML page to Markdown.
    Convert(ConvertArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Scrape(args) => args.recovery.verbose,
            Self::Convert(args) => args.recovery.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to INFO
    let filter = if cli.command.verbose() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Scrape(args) => args.execute(VERSION),
        Commands::Convert(args) => args.execute(VERSION),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
