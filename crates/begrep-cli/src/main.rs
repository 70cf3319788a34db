//! Begrep CLI - Command-line interface for SKOS-AP-NO concept catalogs.

use begrep_cli::commands::{self, Context};
use begrep_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> begrep_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config; the defaults are written on first use of the default path
    let (config, first_run) = match cli.config.as_deref() {
        Some(path) => (Config::load(Some(path))?, false),
        None => {
            let first_run = !Config::path()?.exists();
            (Config::load(None)?, first_run)
        }
    };

    // Log to stderr; RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if first_run {
        if let Err(e) = config.save(None) {
            warn!("Could not write default config: {}", e);
        }
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let principal = cli
        .principal
        .unwrap_or_else(|| config.principal.clone());
    let ctx = Context::open(config, principal, formatter)?;

    match cli.command {
        Command::Import(args) => commands::execute_import(args, &ctx).await?,
        Command::Job(command) => commands::execute_job(command, &ctx).await?,
        Command::Concept(command) => commands::execute_concept(command, &ctx).await?,
    }

    Ok(())
}
