use super::folder::FolderType;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    MissingRequiredField,
    InvalidEntityType,
    MissingReference,
    InvalidValue,
    InvalidOption,
    InvalidCondition,
    InvalidEnchantment,
    InvalidDrop,
    InvalidColorCode,
    InvalidBiome,
    MissingContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
}

impl ValidationIssue {
    pub fn new(
        kind: IssueKind,
        severity: Severity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: None,
            kind,
            severity,
            message: message.into(),
            suggestion: String::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }
}

/// Validation outcome for one entry. `valid` is false iff a critical issue exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryValidation {
    pub name: String,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl EntryValidation {
    pub fn new(name: &str, issues: Vec<ValidationIssue>) -> Self {
        let valid = !issues.iter().any(|i| i.severity == Severity::Critical);
        Self {
            name: name.to_string(),
            valid,
            issues,
        }
    }

    pub fn has_critical(&self) -> bool {
        !self.valid
    }

    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Warning)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileValidation {
    pub file: String,
    pub folder_type: FolderType,
    pub entries: Vec<EntryValidation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub total_entries: usize,
    pub valid_entries: usize,
    /// Entries with warnings but no critical issue.
    pub entries_with_warnings: usize,
    /// Entries with at least one critical issue.
    pub entries_with_errors: usize,
    pub critical_errors: usize,
    pub warnings: usize,
    pub info: usize,
}

/// Names per referenceable entity type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferenceSets {
    pub skills: BTreeSet<String>,
    pub items: BTreeSet<String>,
    pub mobs: BTreeSet<String>,
    pub droptables: BTreeSet<String>,
}

impl ReferenceSets {
    pub fn get(&self, kind: FolderType) -> Option<&BTreeSet<String>> {
        match kind {
            FolderType::Skills => Some(&self.skills),
            FolderType::Items => Some(&self.items),
            FolderType::Mobs => Some(&self.mobs),
            FolderType::DropTables => Some(&self.droptables),
            FolderType::RandomSpawns => None,
        }
    }

    pub fn insert(&mut self, kind: FolderType, name: &str) {
        let bucket = match kind {
            FolderType::Skills => &mut self.skills,
            FolderType::Items => &mut self.items,
            FolderType::Mobs => &mut self.mobs,
            FolderType::DropTables => &mut self.droptables,
            FolderType::RandomSpawns => return,
        };
        bucket.insert(name.to_string());
    }

    pub fn total(&self) -> usize {
        self.skills.len() + self.items.len() + self.mobs.len() + self.droptables.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossReferences {
    pub all_references: ReferenceSets,
    pub resolved_references: ReferenceSets,
    pub missing_references: ReferenceSets,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResults {
    pub pack_name: String,
    pub validation_results: Vec<FileValidation>,
    pub summary: ValidationSummary,
    pub cross_references: CrossReferences,
    /// Relative paths of files that failed to parse, per folder type.
    pub files_with_errors: BTreeMap<FolderType, Vec<String>>,
}

impl ValidationResults {
    /// Index of entry results keyed by `(relative_path, entry_name)`.
    pub fn entry_index(&self) -> HashMap<(&str, &str), &EntryValidation> {
        self.validation_results
            .iter()
            .flat_map(|file| {
                file.entries
                    .iter()
                    .map(move |entry| ((file.file.as_str(), entry.name.as_str()), entry))
            })
            .collect()
    }

    pub fn entry(&self, relative_path: &str, name: &str) -> Option<&EntryValidation> {
        self.validation_results
            .iter()
            .find(|file| file.file == relative_path)
            .and_then(|file| file.entries.iter().find(|entry| entry.name == name))
    }
}
