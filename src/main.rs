//! MythicPack - Import pipeline for MythicMobs configuration packs
//!
//! Main entry point for the command line application.
//!
//! # Overview
//!
//! This binary crate provides the CLI frontend for MythicPack. It initializes:
//! - Configuration loading ([`ConfigManager`])
//! - Logging infrastructure (daily rotating file, optional console output)
//! - Tokio async runtime (file reads and cooperative cancellation)
//! - The requested command ([`cli::run`](mythicpack::cli::run))
//!
//! # Execution Flow
//!
//! 1. Parse the command line
//! 2. Load `MythicPack Config.yaml` from the config directory (defaults if missing)
//! 3. Initialize logging → `<log_dir>/mythicpack.<date>`
//! 4. Load `MythicPack Data.yaml` game tables (built-in tables if missing)
//! 5. Create tokio runtime with 4 worker threads
//! 6. Run the command to completion
//! 7. Shutdown tokio runtime with 5s timeout
//!
//! # Configuration Files
//!
//! Expected in `MythicPack Data/` (or `--config-dir`):
//! - `MythicPack Config.yaml`: import options, workspace and log settings,
//!   overridable with `MYTHICPACK__*` environment variables
//! - `MythicPack Data.yaml`: materials, entity types, mechanics and the other
//!   lookup tables used during validation

use anyhow::Result;
use clap::Parser;
use mythicpack::cli::Cli;
use mythicpack::{APP_NAME, ConfigManager, VERSION};
use std::sync::Arc;

/// Main entry point for the MythicPack CLI
///
/// # Errors
///
/// This function can fail if:
/// - The config directory cannot be created or a config file is invalid YAML
/// - Logging initialization fails (disk space, permissions)
/// - Tokio runtime creation fails (system resources)
/// - The command itself fails (no packs found, workspace not writable, packs
///   that could not be imported)
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let config = config_manager.load_importer_config()?;

    // Keep the guard alive until exit so buffered log lines are flushed
    let _log_guard = mythicpack::logging::setup_logging_with_console(
        &config.log_dir,
        mythicpack::logging::LOG_PREFIX,
        cli.debug || config.debug_mode,
        cli.console || config.console_output,
        config.json_logs,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let game_data = config_manager.load_game_data()?;
    let tables = Arc::new(game_data.tables());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(4)
        .thread_name("mythicpack-worker")
        .build()?;

    tracing::info!("Tokio runtime initialized with {} worker threads", 4);

    let result = runtime.block_on(mythicpack::cli::run(cli, config, tables));

    // Shutdown the tokio runtime gracefully
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    match &result {
        Ok(()) => tracing::info!("Application shutdown complete"),
        Err(e) => tracing::error!("Command failed: {:#}", e),
    }
    result
}
