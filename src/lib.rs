// MythicPack - Import pipeline for MythicMobs configuration packs
//
// This is the library crate containing the pipeline stages, data model and
// session state. The binary crate (main.rs) provides the command line entry point.

pub mod cli;
pub mod config;
pub mod importer;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use importer::{CancelHandle, ImportSource, PackImporter, PipelineError};
pub use models::{
    GameData, GameTables, ImportOptions, ImportPreview, ImportResults, ImportSelection,
    ImporterConfig, Pack,
};
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
