use super::folder::FolderType;
use super::pack::PackInfo;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml_ng::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseIssueKind {
    YamlParseError,
    InvalidStructure,
    ProcessingError,
    EmptyFile,
    DuplicateKey,
}

/// An error or warning attached to one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseIssue {
    #[serde(rename = "type")]
    pub kind: ParseIssueKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Line of the first definition, for duplicate keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line: Option<usize>,
}

impl ParseIssue {
    pub fn new(kind: ParseIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            column: None,
            snippet: None,
            key: None,
            first_line: None,
        }
    }
}

/// One top-level key of a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedEntry {
    pub name: String,
    pub data: Value,
}

/// Parse outcome for one file. Failed files are kept so they can be reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedFile {
    pub relative_path: String,
    pub file_name: String,
    pub folder_type: FolderType,
    pub success: bool,
    pub data: IndexMap<String, Value>,
    pub entries: Vec<ParsedEntry>,
    pub errors: Vec<ParseIssue>,
    pub warnings: Vec<ParseIssue>,
}

impl ParsedFile {
    pub fn empty(relative_path: &str, folder_type: FolderType) -> Self {
        Self {
            relative_path: relative_path.to_string(),
            file_name: file_name_of(relative_path).to_string(),
            folder_type,
            success: true,
            data: IndexMap::new(),
            entries: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn failed(relative_path: &str, folder_type: FolderType, error: ParseIssue) -> Self {
        Self {
            success: false,
            errors: vec![error],
            ..Self::empty(relative_path, folder_type)
        }
    }

    pub fn entry(&self, name: &str) -> Option<&ParsedEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

/// Last path segment of a `/`-separated relative path.
pub fn file_name_of(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub total_entries: usize,
    pub warnings: usize,
}

/// Parse outcome for every file of one pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackParseResults {
    pub pack_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packinfo: Option<PackInfo>,
    pub files: Vec<ParsedFile>,
    pub summary: ParseSummary,
}

impl PackParseResults {
    pub fn new(pack_name: &str, packinfo: Option<PackInfo>, files: Vec<ParsedFile>) -> Self {
        let summary = ParseSummary {
            total_files: files.len(),
            successful_files: files.iter().filter(|f| f.success).count(),
            failed_files: files.iter().filter(|f| !f.success).count(),
            total_entries: files.iter().map(|f| f.entries.len()).sum(),
            warnings: files.iter().map(|f| f.warnings.len()).sum(),
        };
        Self {
            pack_name: pack_name.to_string(),
            packinfo,
            files,
            summary,
        }
    }

    pub fn files_of(&self, folder: FolderType) -> impl Iterator<Item = &ParsedFile> {
        self.files.iter().filter(move |f| f.folder_type == folder)
    }
}
