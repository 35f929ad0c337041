// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folio - portfolio assistant and contact-form mail relay.
//!
//! This is the binary entry point for the Folio services.

mod serve;
mod shell;

use clap::{Parser, Subcommand};
use folio_core::GenerationEngine;
use folio_engine::LocalEngine;

/// Folio - portfolio assistant and contact-form mail relay.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive assistant session.
    Shell,
    /// Start the contact-form mail relay server.
    Serve,
    /// Clear cached model artifacts so the next load re-downloads them.
    ResetCache,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match folio_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            folio_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.assistant.log_level);

    let result = match cli.command {
        Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::ResetCache) => reset_cache(&config).await,
        None => {
            println!("folio: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("folio: {e}");
        std::process::exit(1);
    }
}

/// Removes cached model artifacts. The next `folio shell` downloads them
/// fresh, which is the recovery path after a corrupted download.
async fn reset_cache(config: &folio_config::FolioConfig) -> Result<(), folio_core::FolioError> {
    let engine = LocalEngine::new(&config.engine)?;
    engine.reset_cache().await?;
    println!("model cache cleared");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("folio={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config =
            folio_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.assistant.owner_name, "the portfolio owner");
    }
}
