//! Main Entrypoint for the Orator trainer
//!
//! This binary is responsible for:
//! 1. Parsing command-line overrides.
//! 2. Loading configuration from the environment (a missing API key is fatal).
//! 3. Initializing logging to stderr.
//! 4. Building the shared collaborators.
//! 5. Running the interactive menu on the terminal.

use anyhow::Context;
use clap::Parser;
use orator_service::{cli::Cli, config::Config, console::StdConsole, menu, state::AppState};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // --- 1. Parse Flags ---
    let cli = Cli::parse();

    // --- 2. Load Configuration ---
    let mut config =
        Config::from_env_with_file(cli.config.clone()).context("Failed to load configuration")?;
    cli.apply(&mut config);

    // --- 3. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();

    // --- 4. Initialize Shared Services ---
    let state = AppState::from_config(&config)?;
    info!(
        model = %config.chat_model,
        api_base = %config.api_base,
        progress = %config.progress_path.display(),
        "Trainer configured. Starting menu..."
    );

    // --- 5. Run ---
    let mut console = StdConsole::new();
    menu::run(&state, &mut console)
        .await
        .context("Terminal input failed")?;

    info!("Trainer has shut down.");
    Ok(())
}
