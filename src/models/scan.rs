use super::folder::FolderType;
use camino::Utf8PathBuf;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Where a scanned file's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// A file on a real directory tree.
    Disk(Utf8PathBuf),
    /// Contents handed over with a flat file selection.
    Memory(Arc<str>),
}

impl FileSource {
    pub async fn read_text(&self) -> std::io::Result<String> {
        match self {
            FileSource::Disk(path) => tokio::fs::read_to_string(path).await,
            FileSource::Memory(text) => Ok(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannedFile {
    pub name: String,
    /// Path relative to the pack root, `/`-separated (e.g. `Mobs/bosses/king.yml`).
    pub relative_path: String,
    #[serde(skip)]
    pub source: FileSource,
}

/// A recognized pack folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannedPack {
    pub name: String,
    pub folders: BTreeMap<FolderType, Vec<ScannedFile>>,
    pub packinfo: Option<ScannedFile>,
    pub tooltips: Option<ScannedFile>,
    /// Files the importer will not read, relative to the pack root.
    pub unsupported_files: Vec<String>,
}

impl ScannedPack {
    pub fn files(&self, folder: FolderType) -> &[ScannedFile] {
        self.folders.get(&folder).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entity_file_count(&self) -> usize {
        self.folders.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootKind {
    /// The selected folder is itself a pack.
    SinglePack,
    /// The selected folder contains packs.
    PacksFolder,
    /// Neither.
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanSummary {
    pub total_packs: usize,
    pub total_files: usize,
    pub files_by_type: BTreeMap<FolderType, usize>,
    pub unsupported_files: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResults {
    pub root_name: String,
    pub root_kind: RootKind,
    pub packs: Vec<ScannedPack>,
    /// Unsupported files directly under a packs folder, outside any pack.
    pub unsupported_files: Vec<String>,
    pub summary: ScanSummary,
}

impl ScanResults {
    pub fn new(
        root_name: String,
        root_kind: RootKind,
        packs: Vec<ScannedPack>,
        unsupported_files: Vec<String>,
    ) -> Self {
        let mut summary = ScanSummary {
            total_packs: packs.len(),
            ..ScanSummary::default()
        };
        for pack in &packs {
            for (folder, files) in &pack.folders {
                *summary.files_by_type.entry(*folder).or_default() += files.len();
                summary.total_files += files.len();
            }
            summary.unsupported_files += pack.unsupported_files.len();
        }
        summary.unsupported_files += unsupported_files.len();

        Self {
            root_name,
            root_kind,
            packs,
            unsupported_files,
            summary,
        }
    }
}
