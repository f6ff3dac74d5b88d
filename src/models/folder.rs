use serde::{Deserialize, Serialize};
use std::fmt;

/// The five canonical sub-folders of a MythicMobs pack.
///
/// Folder names are matched case-sensitively, the way the plugin loads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
    Mobs,
    Skills,
    Items,
    DropTables,
    RandomSpawns,
}

impl FolderType {
    /// All folder types in processing order.
    pub const ALL: [FolderType; 5] = [
        FolderType::Mobs,
        FolderType::Skills,
        FolderType::Items,
        FolderType::DropTables,
        FolderType::RandomSpawns,
    ];

    /// Name of the folder on disk (e.g. `DropTables`).
    pub fn folder_name(self) -> &'static str {
        match self {
            FolderType::Mobs => "Mobs",
            FolderType::Skills => "Skills",
            FolderType::Items => "Items",
            FolderType::DropTables => "DropTables",
            FolderType::RandomSpawns => "RandomSpawns",
        }
    }

    /// Resolve an on-disk folder name. Case-sensitive.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.folder_name() == name)
    }

    /// Singular label used in messages ("mob", "drop table", ...).
    pub fn label(self) -> &'static str {
        match self {
            FolderType::Mobs => "mob",
            FolderType::Skills => "skill",
            FolderType::Items => "item",
            FolderType::DropTables => "drop table",
            FolderType::RandomSpawns => "random spawn",
        }
    }
}

impl fmt::Display for FolderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_names_are_case_sensitive() {
        assert_eq!(FolderType::from_folder_name("DropTables"), Some(FolderType::DropTables));
        assert_eq!(FolderType::from_folder_name("droptables"), None);
        assert_eq!(FolderType::from_folder_name("Mobs"), Some(FolderType::Mobs));
    }
}
