//! Services module - Pipeline stages for importing MythicMobs packs.
//!
//! Every stage is synchronous or plain async, takes its inputs explicitly and
//! owns its output until it is handed to the next stage. Lookup tables come in
//! as [`GameTables`](crate::models::GameTables); nothing reads global state.
//!
//! # Components
//!
//! - [`PackFolderScanner`]: finds packs in a directory or a flat file selection
//!   and groups their YAML files by folder type
//! - [`YamlFileParser`]: tolerant per-file parsing with duplicate-key and
//!   line-level error recovery
//! - [`references`]: skill, condition, equipment and drop line decoding shared
//!   by validation and conversion
//! - [`DataValidator`]: cross-reference validation of a parsed pack
//! - [`EntryConverter`] and [`ImportExecutor`]: typed conversion and the merge
//!   into a destination pack (duplicate policies, placeholder synthesis)
//! - [`PackManager`]: where destination packs live ([`WorkspacePackManager`] on
//!   disk, [`MemoryPackManager`] for dry runs and tests)
//! - [`ImportReport`]: plain-text summaries of a preview and of results
//!
//! # Usage Example
//!
//! ```ignore
//! use mythicpack::services::{DataValidator, PackFolderScanner, YamlFileParser};
//!
//! let scan = PackFolderScanner::new().scan_directory(Utf8Path::new("packs"))?;
//! let parser = YamlFileParser::new();
//! let validator = DataValidator::new(tables.clone());
//! // ...parse each scanned file, then validate the pack
//! let validation = validator.validate_pack(&parse_results);
//! ```

pub mod converter;
pub mod executor;
pub mod pack_manager;
pub mod parser;
pub mod references;
pub mod report;
pub mod scanner;
pub mod validator;

pub use converter::{ConversionError, EntryConverter};
pub use executor::{ExecuteError, ImportExecutor, PLACEHOLDER_FILE, RENAME_SUFFIX};
pub use pack_manager::{MemoryPackManager, PackManager, WorkspacePackManager, describe_pack_tree};
pub use parser::YamlFileParser;
pub use report::ImportReport;
pub use scanner::{PackFolderScanner, ScanError, SelectedFile};
pub use validator::DataValidator;
