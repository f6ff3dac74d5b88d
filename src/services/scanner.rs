//! Pack folder discovery.
//!
//! A real directory (walked with `walkdir`) and a flat list of files carrying
//! `/`-separated relative paths are both folded into the same [`FolderNode`]
//! tree first; classification only ever sees that tree.

use crate::models::{FileSource, FolderType, RootKind, ScanResults, ScannedFile, ScannedPack};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Folder not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("Not a folder: {0}")]
    NotADirectory(Utf8PathBuf),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Failed to read {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("No files were selected")]
    EmptySelection,
}

/// A file handed over as part of a flat selection, e.g.
/// `MyPack/Mobs/zombie.yml`. The first path segment is the selected folder.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub relative_path: String,
    pub contents: Arc<str>,
}

impl SelectedFile {
    pub fn new(relative_path: impl Into<String>, contents: impl Into<Arc<str>>) -> Self {
        Self {
            relative_path: relative_path.into(),
            contents: contents.into(),
        }
    }
}

/// Virtual folder tree. Children are kept sorted by name so both acquisition
/// strategies produce the same order.
#[derive(Debug, Default)]
struct FolderNode {
    folders: BTreeMap<String, FolderNode>,
    files: BTreeMap<String, FileSource>,
}

impl FolderNode {
    fn insert(&mut self, segments: &[&str], source: FileSource) {
        match segments {
            [] => {}
            [file] => {
                self.files.insert((*file).to_string(), source);
            }
            [folder, rest @ ..] => self
                .folders
                .entry((*folder).to_string())
                .or_default()
                .insert(rest, source),
        }
    }

    /// Directly holds at least one canonical sub-folder.
    fn is_pack_folder(&self) -> bool {
        self.folders
            .keys()
            .any(|name| FolderType::from_folder_name(name).is_some())
    }

    /// Every file below this node as `(prefix/relative_path, source)`.
    fn collect_files(&self, prefix: &str, out: &mut Vec<(String, FileSource)>) {
        for (name, source) in &self.files {
            out.push((join(prefix, name), source.clone()));
        }
        for (name, child) in &self.folders {
            child.collect_files(&join(prefix, name), out);
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

fn is_yaml(name: &str) -> bool {
    Utf8Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
        .unwrap_or(false)
}

/// `packinfo.yml` / `tooltips.yaml` style config files at a pack root.
fn is_config_file(name: &str, stem: &str) -> bool {
    is_yaml(name)
        && Utf8Path::new(name)
            .file_stem()
            .map(|s| s.eq_ignore_ascii_case(stem))
            .unwrap_or(false)
}

fn file_name_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PackFolderScanner;

impl PackFolderScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan a directory on disk.
    pub fn scan_directory(&self, root: &Utf8Path) -> Result<ScanResults, ScanError> {
        if !root.exists() {
            return Err(ScanError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut tree = FolderNode::default();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| walk_error(root, err))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = Utf8PathBuf::try_from(entry.path().to_path_buf())
                .map_err(|err| ScanError::NonUtf8Path(err.into_path_buf().display().to_string()))?;
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let segments: Vec<&str> = relative.components().map(|c| c.as_str()).collect();
            tree.insert(&segments, FileSource::Disk(path.clone()));
        }

        let root_name = root
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| root.to_string());
        tracing::debug!("Walked {} into virtual tree", root);
        Ok(self.classify(root_name, &tree))
    }

    /// Scan a flat selection of files with `/`-separated relative paths.
    pub fn scan_file_list(&self, files: &[SelectedFile]) -> Result<ScanResults, ScanError> {
        if files.is_empty() {
            return Err(ScanError::EmptySelection);
        }

        let mut tree = FolderNode::default();
        let mut root_name: Option<String> = None;

        for file in files {
            let normalized = file.relative_path.replace('\\', "/");
            let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
            let Some((first, rest)) = segments.split_first() else {
                continue;
            };
            if rest.is_empty() {
                // A bare file name: the selection root itself is unnamed.
                tree.insert(&segments, FileSource::Memory(Arc::clone(&file.contents)));
                continue;
            }
            root_name.get_or_insert_with(|| (*first).to_string());
            tree.insert(rest, FileSource::Memory(Arc::clone(&file.contents)));
        }

        Ok(self.classify(root_name.unwrap_or_default(), &tree))
    }

    fn classify(&self, root_name: String, root: &FolderNode) -> ScanResults {
        if root.is_pack_folder() {
            let packs = build_pack(&root_name, root).into_iter().collect();
            let results = ScanResults::new(root_name, RootKind::SinglePack, packs, Vec::new());
            log_scan(&results);
            return results;
        }

        if !root.folders.values().any(FolderNode::is_pack_folder) {
            tracing::warn!("No MythicMobs pack structure found in {}", root_name);
            return ScanResults::new(root_name, RootKind::Empty, Vec::new(), Vec::new());
        }

        let mut packs = Vec::new();
        let mut unsupported = Vec::new();
        for name in root.files.keys() {
            unsupported.push(name.clone());
        }
        for (name, child) in &root.folders {
            if child.is_pack_folder() {
                if let Some(pack) = build_pack(name, child) {
                    packs.push(pack);
                }
            } else {
                let mut files = Vec::new();
                child.collect_files(name, &mut files);
                unsupported.extend(files.into_iter().map(|(path, _)| path));
            }
        }

        let results = ScanResults::new(root_name, RootKind::PacksFolder, packs, unsupported);
        log_scan(&results);
        results
    }
}

fn walk_error(root: &Utf8Path, err: walkdir::Error) -> ScanError {
    let path = err
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| root.to_string());
    if err.io_error().map(io::Error::kind) == Some(io::ErrorKind::PermissionDenied) {
        ScanError::AccessDenied(path)
    } else {
        ScanError::Walk { path, source: err }
    }
}

/// Classify one pack folder. Returns `None` when it holds no entity files.
fn build_pack(name: &str, node: &FolderNode) -> Option<ScannedPack> {
    let mut pack = ScannedPack {
        name: name.to_string(),
        folders: BTreeMap::new(),
        packinfo: None,
        tooltips: None,
        unsupported_files: Vec::new(),
    };

    for (file_name, source) in &node.files {
        let scanned = ScannedFile {
            name: file_name.clone(),
            relative_path: file_name.clone(),
            source: source.clone(),
        };
        if pack.packinfo.is_none() && is_config_file(file_name, "packinfo") {
            pack.packinfo = Some(scanned);
        } else if pack.tooltips.is_none() && is_config_file(file_name, "tooltips") {
            pack.tooltips = Some(scanned);
        } else {
            pack.unsupported_files.push(file_name.clone());
        }
    }

    for (folder_name, child) in &node.folders {
        let mut files = Vec::new();
        child.collect_files(folder_name, &mut files);

        let Some(folder_type) = FolderType::from_folder_name(folder_name) else {
            pack.unsupported_files
                .extend(files.into_iter().map(|(path, _)| path));
            continue;
        };

        for (relative_path, source) in files {
            if is_yaml(&relative_path) {
                pack.folders
                    .entry(folder_type)
                    .or_default()
                    .push(ScannedFile {
                        name: file_name_of(&relative_path),
                        relative_path,
                        source,
                    });
            } else {
                pack.unsupported_files.push(relative_path);
            }
        }
    }

    if pack.entity_file_count() == 0 {
        tracing::info!("Skipping {}: no entity files in any pack folder", name);
        return None;
    }
    Some(pack)
}

fn log_scan(results: &ScanResults) {
    tracing::info!(
        "Scanned {} ({:?}): {} packs, {} files, {} unsupported",
        results.root_name,
        results.root_kind,
        results.summary.total_packs,
        results.summary.total_files,
        results.summary.unsupported_files
    );
}
