//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Default configuration when files are missing
//! - Importer config and game data save/load round trips
//! - `MYTHICPACK__*` environment overrides
//! - Custom game data feeding validation
//! - Invalid YAML handling

use camino::Utf8PathBuf;
use mythicpack::models::{DuplicatePolicy, FolderType, PackParseResults, ParseErrorPolicy};
use mythicpack::services::{DataValidator, YamlFileParser};
use mythicpack::{ConfigManager, GameData, ImporterConfig};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    let mut map = config::Map::new();
    for (key, value) in pairs {
        map.insert(key.to_string(), value.to_string());
    }
    Some(map)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(
        manager.importer_config_path(),
        config_path.join("MythicPack Config.yaml")
    );
    assert_eq!(manager.game_data_path(), config_path.join("MythicPack Data.yaml"));
}

#[test]
fn test_config_directory_creation() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("nested").join("MythicPack Data");

    assert!(!nested.exists());
    ConfigManager::new(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn test_load_defaults_when_files_missing() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let config = manager.load_importer_config_with_env(env(&[])).unwrap();
    assert_eq!(config, ImporterConfig::default());

    let data = manager.load_game_data().unwrap();
    assert_eq!(data, GameData::default());
    assert!(data.tables().is_material("diamond_sword"));
}

#[test]
fn test_save_and_load_importer_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut config = ImporterConfig::default();
    config.import.duplicates = DuplicatePolicy::Rename;
    config.import.on_warnings = false;
    config.workspace_dir = "packs".to_string();
    config.debug_mode = true;
    manager.save_importer_config(&config).unwrap();

    let loaded = manager.load_importer_config_with_env(env(&[])).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(
        manager.importer_config_path(),
        "import:\n  duplicates: replace\nworkspace_dir: from-file\n",
    )
    .unwrap();

    let loaded = manager
        .load_importer_config_with_env(env(&[
            ("MYTHICPACK__IMPORT__DUPLICATES", "rename"),
            ("MYTHICPACK__IMPORT__ON_PARSE_ERRORS", "stop"),
            ("MYTHICPACK__DEBUG_MODE", "true"),
        ]))
        .unwrap();

    assert_eq!(loaded.import.duplicates, DuplicatePolicy::Rename);
    assert_eq!(loaded.import.on_parse_errors, ParseErrorPolicy::Stop);
    assert!(loaded.debug_mode);
    assert_eq!(loaded.workspace_dir, "from-file");
}

#[test]
fn test_custom_game_data_drives_validation() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut data = GameData::default();
    data.version = "custom".to_string();
    data.mechanics.push("shieldbash".to_string());
    manager.save_game_data(&data).unwrap();

    let loaded = manager.load_game_data().unwrap();
    assert_eq!(loaded, data);

    // With `shieldbash` known it is a mechanic, not a reference to a skill.
    let parser = YamlFileParser::new();
    let parse = PackParseResults::new(
        "Test",
        None,
        vec![parser.parse(
            "Bash:\n  Skills:\n  - shieldbash{power=2} @target\n",
            "Skills/bash.yml",
            FolderType::Skills,
        )],
    );

    let custom = DataValidator::new(Arc::new(loaded.tables())).validate_pack(&parse);
    assert!(custom.cross_references.missing_references.skills.is_empty());

    let builtin = DataValidator::new(Arc::new(GameData::default().tables())).validate_pack(&parse);
    assert!(builtin.cross_references.missing_references.skills.contains("shieldbash"));
}

#[test]
fn test_invalid_yaml_handling() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(manager.game_data_path(), "Materials: [STONE\n").unwrap();
    assert!(manager.load_game_data().is_err(), "Should fail to parse invalid YAML");

    fs::write(manager.importer_config_path(), "import: {{").unwrap();
    assert!(manager.load_importer_config_with_env(env(&[])).is_err());
}
