//! Data models for the MythicPack importer.
//!
//! - [`Pack`], [`FileContainer`], [`PackEntry`]: the destination pack model
//! - [`ParsedFile`], [`ScanResults`], [`ValidationResults`], [`ImportResults`]:
//!   per-run records handed from one pipeline stage to the next
//! - [`CiRecord`]: case-insensitive view over a YAML section
//! - [`GameData`] / [`GameTables`]: lookup tables loaded from `MythicPack Data.yaml`
//! - [`ImporterConfig`]: user settings loaded from `MythicPack Config.yaml`
//! - [`ImportState`]: session state owned by [`StateManager`](crate::state::StateManager)

pub mod config;
pub mod drop;
pub mod folder;
pub mod game_data;
pub mod import;
pub mod import_state;
pub mod options;
pub mod pack;
pub mod parse;
pub mod record;
pub mod scan;
pub mod validation;

pub use config::ImporterConfig;
pub use drop::{DropDefinition, DropKind};
pub use folder::FolderType;
pub use game_data::{GameData, GameTables};
pub use import::{
    EntryFailure, FileImportResult, ImportPhase, ImportPreview, ImportProgress, ImportResults,
    ImportSelection, PackError, PackImportResult, PackPreview, PlaceholderRecord,
};
pub use import_state::ImportState;
pub use options::{DuplicatePolicy, ImportOptions, MissingReferencePolicy, ParseErrorPolicy};
pub use pack::{
    DropTableEntry, FileContainer, ImportMeta, ItemEntry, MobEntry, Pack, PackEntry, PackInfo,
    RandomSpawnEntry, SkillEntry,
};
pub use parse::{PackParseResults, ParseIssue, ParseIssueKind, ParseSummary, ParsedEntry, ParsedFile};
pub use record::CiRecord;
pub use scan::{FileSource, RootKind, ScanResults, ScanSummary, ScannedFile, ScannedPack};
pub use validation::{
    CrossReferences, EntryValidation, FileValidation, IssueKind, ReferenceSets, Severity,
    ValidationIssue, ValidationResults, ValidationSummary,
};
