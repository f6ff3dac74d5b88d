use super::folder::FolderType;
use super::parse::PackParseResults;
use super::scan::ScanResults;
use super::validation::ValidationResults;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Import session phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportPhase {
    #[default]
    Idle,
    Scanning,
    Parsing,
    Validating,
    PreviewReady,
    Importing,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Scanning => "scanning",
            ImportPhase::Parsing => "parsing",
            ImportPhase::Validating => "validating",
            ImportPhase::PreviewReady => "preview ready",
            ImportPhase::Importing => "importing",
        };
        f.write_str(text)
    }
}

/// Payload of every progress report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportProgress {
    pub phase: ImportPhase,
    pub pack_index: usize,
    pub total_packs: usize,
    pub pack_name: String,
    pub current_file: Option<String>,
    pub files_processed: usize,
    pub total_files: usize,
    pub percentage: f32,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileImportResult {
    pub file: String,
    pub folder_type: Option<FolderType>,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// An entry (or whole file) that could not be imported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryFailure {
    pub file: String,
    pub entry: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderRecord {
    pub pack: String,
    pub folder_type: FolderType,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackImportResult {
    pub pack_name: String,
    pub destination: String,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files: Vec<FileImportResult>,
    pub failures: Vec<EntryFailure>,
    pub placeholders: Vec<PlaceholderRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackError {
    pub pack: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportResults {
    pub success: bool,
    pub packs: Vec<PackImportResult>,
    pub total_imported: usize,
    pub total_skipped: usize,
    pub total_failed: usize,
    pub placeholders_created: Vec<PlaceholderRecord>,
    pub errors: Vec<PackError>,
    pub duration: Duration,
}

impl ImportResults {
    pub fn record_pack(&mut self, pack: PackImportResult) {
        self.total_imported += pack.imported;
        self.total_skipped += pack.skipped;
        self.total_failed += pack.failed;
        self.placeholders_created
            .extend(pack.placeholders.iter().cloned());
        self.packs.push(pack);
    }
}

/// What the user chose to import from a preview.
///
/// Everything is included unless excluded. Packs merge into the destination
/// pack of the same name unless `destination` names a single target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSelection {
    pub destination: Option<String>,
    excluded_packs: BTreeSet<String>,
    /// `(pack, relative_path)`
    excluded_files: BTreeSet<(String, String)>,
    /// `(pack, relative_path, entry)`
    excluded_entries: BTreeSet<(String, String, String)>,
}

impl ImportSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn into_destination(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            ..Self::default()
        }
    }

    pub fn exclude_pack(mut self, pack: &str) -> Self {
        self.excluded_packs.insert(pack.to_string());
        self
    }

    pub fn exclude_file(mut self, pack: &str, relative_path: &str) -> Self {
        self.excluded_files
            .insert((pack.to_string(), relative_path.to_string()));
        self
    }

    pub fn exclude_entry(mut self, pack: &str, relative_path: &str, entry: &str) -> Self {
        self.excluded_entries.insert((
            pack.to_string(),
            relative_path.to_string(),
            entry.to_string(),
        ));
        self
    }

    pub fn includes_pack(&self, pack: &str) -> bool {
        !self.excluded_packs.contains(pack)
    }

    pub fn includes_file(&self, pack: &str, relative_path: &str) -> bool {
        !self
            .excluded_files
            .contains(&(pack.to_string(), relative_path.to_string()))
    }

    pub fn includes_entry(&self, pack: &str, relative_path: &str, entry: &str) -> bool {
        !self.excluded_entries.contains(&(
            pack.to_string(),
            relative_path.to_string(),
            entry.to_string(),
        ))
    }

    /// Destination pack for the source pack `pack`.
    pub fn destination_for<'a>(&'a self, pack: &'a str) -> &'a str {
        self.destination.as_deref().unwrap_or(pack)
    }
}

/// Parse and validation outcome of one scanned pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackPreview {
    pub parse: PackParseResults,
    pub validation: ValidationResults,
}

impl PackPreview {
    pub fn name(&self) -> &str {
        &self.parse.pack_name
    }
}

/// Everything the scan, parse and validate phases produced, waiting for the
/// user to choose what to import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportPreview {
    pub scan: ScanResults,
    pub packs: Vec<PackPreview>,
}

impl ImportPreview {
    pub fn pack(&self, name: &str) -> Option<&PackPreview> {
        self.packs.iter().find(|pack| pack.name() == name)
    }

    pub fn pack_names(&self) -> Vec<&str> {
        self.packs.iter().map(PackPreview::name).collect()
    }

    pub fn total_entries(&self) -> usize {
        self.packs
            .iter()
            .map(|pack| pack.parse.summary.total_entries)
            .sum()
    }
}
