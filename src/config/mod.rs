use crate::models::{GameData, ImporterConfig};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Prefix of environment variables that override `MythicPack Config.yaml`.
pub const ENV_PREFIX: &str = "MYTHICPACK";

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages two configuration files:
/// - Importer config (`MythicPack Config.yaml`): import options, workspace and logging
/// - Game data (`MythicPack Data.yaml`): materials, entity types, mechanics and the
///   other lookup tables used by validation
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    importer_config_path: Utf8PathBuf,
    game_data_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing configuration files (e.g., "MythicPack Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            importer_config_path: config_dir.join("MythicPack Config.yaml"),
            game_data_path: config_dir.join("MythicPack Data.yaml"),
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn importer_config_path(&self) -> &Utf8Path {
        &self.importer_config_path
    }

    pub fn game_data_path(&self) -> &Utf8Path {
        &self.game_data_path
    }

    /// Load the importer configuration.
    ///
    /// Values come from `MythicPack Config.yaml` (optional) overlaid with
    /// `MYTHICPACK__*` environment variables, e.g.
    /// `MYTHICPACK__IMPORT__DUPLICATES=rename`.
    pub fn load_importer_config(&self) -> Result<ImporterConfig> {
        self.load_importer_config_with_env(None)
    }

    /// Same as [`load_importer_config`](Self::load_importer_config), reading
    /// overrides from `env` instead of the process environment when given.
    pub fn load_importer_config_with_env(
        &self,
        env: Option<config::Map<String, String>>,
    ) -> Result<ImporterConfig> {
        if !self.importer_config_path.exists() {
            tracing::warn!(
                "Importer config file not found at {}, using defaults",
                self.importer_config_path
            );
        }

        let settings = Config::builder()
            .add_source(
                File::new(self.importer_config_path.as_str(), FileFormat::Yaml).required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| {
                format!("Failed to read importer config: {}", self.importer_config_path)
            })?;

        let config: ImporterConfig = settings.try_deserialize().with_context(|| {
            format!("Failed to parse importer config: {}", self.importer_config_path)
        })?;

        tracing::info!(
            "Loaded importer config: duplicates={:?}, missing_references={:?}, workspace={}",
            config.import.duplicates,
            config.import.missing_references,
            config.workspace_dir
        );
        Ok(config)
    }

    /// Save the importer configuration file.
    pub fn save_importer_config(&self, config: &ImporterConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize importer config to YAML")?;

        fs::write(&self.importer_config_path, yaml_string).with_context(|| {
            format!("Failed to write importer config: {}", self.importer_config_path)
        })?;

        tracing::info!("Saved importer config to {}", self.importer_config_path);
        Ok(())
    }

    /// Load the game data tables.
    ///
    /// # Returns
    /// The loaded GameData, or the built-in tables if the file doesn't exist
    pub fn load_game_data(&self) -> Result<GameData> {
        if !self.game_data_path.exists() {
            tracing::warn!(
                "Game data file not found at {}, using built-in tables",
                self.game_data_path
            );
            return Ok(GameData::default());
        }

        let file_contents = fs::read_to_string(&self.game_data_path)
            .with_context(|| format!("Failed to read game data: {}", self.game_data_path))?;

        let data: GameData = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse game data: {}", self.game_data_path))?;

        tracing::info!(
            "Loaded game data {} from {} ({} materials, {} mechanics)",
            data.version,
            self.game_data_path,
            data.materials.len(),
            data.mechanics.len()
        );
        Ok(data)
    }

    /// Save the game data tables.
    pub fn save_game_data(&self, data: &GameData) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(data).context("Failed to serialize game data to YAML")?;

        fs::write(&self.game_data_path, yaml_string)
            .with_context(|| format!("Failed to write game data: {}", self.game_data_path))?;

        tracing::info!("Saved game data to {}", self.game_data_path);
        Ok(())
    }
}
