//! Destination pack storage.
//!
//! The importer never touches persistent storage itself. It asks a
//! [`PackManager`] for destination packs, hands back the merged result, and
//! finally calls the two lifecycle hooks (`save_packs`, `render_pack_tree`).

use crate::models::{FolderType, Pack, PackInfo};
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;

#[cfg_attr(test, mockall::automock)]
pub trait PackManager: Send {
    /// A copy of the destination pack called `name` (case-insensitive).
    fn find_pack(&self, name: &str) -> Option<Pack>;

    fn create_pack(&mut self, name: &str, packinfo: Option<PackInfo>) -> Result<Pack>;

    /// Replace the stored copy of `pack`.
    fn store_pack(&mut self, pack: Pack) -> Result<()>;

    fn save_packs(&mut self) -> Result<()>;

    fn render_pack_tree(&mut self);

    fn set_active_pack(&mut self, name: &str);

    fn pack_names(&self) -> Vec<String>;
}

/// Indented outline of a pack: folders, files and entry names.
pub fn describe_pack_tree(pack: &Pack) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} entries)", pack.name, pack.entry_count());
    for folder in FolderType::ALL {
        let containers = pack.collection(folder);
        if containers.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {}/", folder.folder_name());
        for container in containers {
            let _ = writeln!(out, "    {} ({})", container.file_name, container.entries.len());
            for entry in &container.entries {
                let marker = if entry.is_placeholder() { " [placeholder]" } else { "" };
                let _ = writeln!(out, "      - {}{}", entry.name(), marker);
            }
        }
    }
    out
}

/// File name used for a pack inside the workspace.
fn pack_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ' | '.') { c } else { '_' })
        .collect();
    format!("{}.yaml", stem.trim())
}

fn find_key<'a>(packs: &'a BTreeMap<String, Pack>, name: &str) -> Option<&'a String> {
    packs.keys().find(|key| key.eq_ignore_ascii_case(name))
}

/// Packs stored as one YAML document each under a workspace directory.
#[derive(Debug)]
pub struct WorkspacePackManager {
    workspace_dir: Utf8PathBuf,
    packs: BTreeMap<String, Pack>,
    dirty: BTreeSet<String>,
    active: Option<String>,
}

impl WorkspacePackManager {
    /// Open (and create if missing) a workspace, loading every `*.yaml` pack.
    pub fn open<P: AsRef<Utf8Path>>(workspace_dir: P) -> Result<Self> {
        let workspace_dir = workspace_dir.as_ref().to_path_buf();
        if !workspace_dir.exists() {
            fs::create_dir_all(&workspace_dir)
                .with_context(|| format!("Failed to create workspace directory: {}", workspace_dir))?;
        }

        let mut packs = BTreeMap::new();
        let entries = fs::read_dir(&workspace_dir)
            .with_context(|| format!("Failed to read workspace directory: {}", workspace_dir))?;
        for entry in entries {
            let entry = entry.context("Failed to read workspace entry")?;
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.path()) else {
                tracing::warn!("Skipping non UTF-8 path in workspace: {:?}", entry.path());
                continue;
            };
            if path.extension() != Some("yaml") || !path.is_file() {
                continue;
            }

            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read pack file: {}", path))?;
            match serde_yaml_ng::from_str::<Pack>(&contents) {
                Ok(pack) => {
                    tracing::debug!("Loaded pack {} from {}", pack.name, path);
                    packs.insert(pack.name.clone(), pack);
                }
                Err(e) => tracing::warn!("Skipping unreadable pack file {}: {}", path, e),
            }
        }

        tracing::info!("Opened workspace {} with {} packs", workspace_dir, packs.len());
        Ok(Self {
            workspace_dir,
            packs,
            dirty: BTreeSet::new(),
            active: None,
        })
    }

    pub fn workspace_dir(&self) -> &Utf8Path {
        &self.workspace_dir
    }

    pub fn active_pack(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn pack_path(&self, name: &str) -> Utf8PathBuf {
        self.workspace_dir.join(pack_file_name(name))
    }
}

impl PackManager for WorkspacePackManager {
    fn find_pack(&self, name: &str) -> Option<Pack> {
        find_key(&self.packs, name).and_then(|key| self.packs.get(key)).cloned()
    }

    fn create_pack(&mut self, name: &str, packinfo: Option<PackInfo>) -> Result<Pack> {
        if name.trim().is_empty() {
            bail!("Pack name must not be empty");
        }
        if find_key(&self.packs, name).is_some() {
            bail!("A pack named \"{}\" already exists", name);
        }

        let pack = Pack {
            packinfo,
            ..Pack::new(name)
        };
        self.packs.insert(pack.name.clone(), pack.clone());
        self.dirty.insert(pack.name.clone());
        tracing::info!("Created pack {}", name);
        Ok(pack)
    }

    fn store_pack(&mut self, pack: Pack) -> Result<()> {
        let key = find_key(&self.packs, &pack.name)
            .cloned()
            .with_context(|| format!("Pack \"{}\" does not exist in the workspace", pack.name))?;
        self.dirty.insert(key.clone());
        self.packs.insert(key, pack);
        Ok(())
    }

    /// Write every modified pack. A pack stays marked as modified until its
    /// file has been written, so a failed save can be retried.
    fn save_packs(&mut self) -> Result<()> {
        let pending: Vec<String> = self.dirty.iter().cloned().collect();
        for name in pending {
            let Some(pack) = self.packs.get(&name) else {
                self.dirty.remove(&name);
                continue;
            };
            let path = self.pack_path(&name);
            let yaml = serde_yaml_ng::to_string(pack)
                .with_context(|| format!("Failed to serialize pack {}", name))?;
            fs::write(&path, yaml).with_context(|| format!("Failed to write pack file: {}", path))?;
            self.dirty.remove(&name);
            tracing::info!("Saved pack {} to {}", name, path);
        }
        Ok(())
    }

    fn render_pack_tree(&mut self) {
        for pack in self.packs.values() {
            tracing::debug!("Pack tree:\n{}", describe_pack_tree(pack));
        }
    }

    fn set_active_pack(&mut self, name: &str) {
        self.active = find_key(&self.packs, name).cloned();
    }

    fn pack_names(&self) -> Vec<String> {
        self.packs.keys().cloned().collect()
    }
}

/// Packs held only in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryPackManager {
    packs: BTreeMap<String, Pack>,
    pub saves: usize,
    pub renders: usize,
    pub active: Option<String>,
}

impl MemoryPackManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pack(mut self, pack: Pack) -> Self {
        self.packs.insert(pack.name.clone(), pack);
        self
    }

    pub fn pack(&self, name: &str) -> Option<&Pack> {
        find_key(&self.packs, name).and_then(|key| self.packs.get(key))
    }
}

impl PackManager for MemoryPackManager {
    fn find_pack(&self, name: &str) -> Option<Pack> {
        self.pack(name).cloned()
    }

    fn create_pack(&mut self, name: &str, packinfo: Option<PackInfo>) -> Result<Pack> {
        if find_key(&self.packs, name).is_some() {
            bail!("A pack named \"{}\" already exists", name);
        }
        let pack = Pack {
            packinfo,
            ..Pack::new(name)
        };
        self.packs.insert(pack.name.clone(), pack.clone());
        Ok(pack)
    }

    fn store_pack(&mut self, pack: Pack) -> Result<()> {
        let key = find_key(&self.packs, &pack.name)
            .cloned()
            .unwrap_or_else(|| pack.name.clone());
        self.packs.insert(key, pack);
        Ok(())
    }

    fn save_packs(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }

    fn render_pack_tree(&mut self) {
        self.renders += 1;
    }

    fn set_active_pack(&mut self, name: &str) {
        self.active = Some(name.to_string());
    }

    fn pack_names(&self) -> Vec<String> {
        self.packs.keys().cloned().collect()
    }
}
