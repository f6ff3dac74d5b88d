use super::options::ImportOptions;
use serde::{Deserialize, Serialize};

/// Importer settings from `MythicPack Config.yaml`.
///
/// Keys are snake_case so `MYTHICPACK__*` environment variables map onto
/// them directly (`MYTHICPACK__IMPORT__DUPLICATES=rename`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImporterConfig {
    #[serde(default)]
    pub import: ImportOptions,

    /// Where destination packs are stored, one YAML document per pack.
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default)]
    pub console_output: bool,

    /// Write the log file as JSON lines instead of plain text.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            import: ImportOptions::default(),
            workspace_dir: default_workspace_dir(),
            log_dir: default_log_dir(),
            debug_mode: false,
            console_output: false,
            json_logs: false,
        }
    }
}

fn default_workspace_dir() -> String {
    "MythicPack Workspace".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}
