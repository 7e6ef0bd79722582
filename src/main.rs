//! Audioforge CLI
//!
//! Command-line interface for the Audioforge editing engine.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use audioforge::cli::commands::execute;
use audioforge::cli::Cli;
use audioforge::{AudioEditor, EditorConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Audioforge v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    let editor = AudioEditor::new().with_config(config);

    let result = execute(&editor, &cli.command)?;
    println!("{}", serde_json::to_string_pretty(&result.to_json())?);

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
