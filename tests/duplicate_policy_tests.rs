//! Integration tests for duplicate resolution during import
//!
//! A destination pack already holds a skill `Fireball` in `existing.yml`;
//! the source pack brings another `Fireball`. These tests verify:
//! - skip leaves the destination untouched and counts the entry as skipped
//! - replace overwrites the entry where it already lives
//! - rename imports the entry as `Fireball_imported`
//! - name matching ignores case

use mythicpack::models::{DuplicatePolicy, FileContainer, FolderType, PackEntry, SkillEntry};
use mythicpack::services::{MemoryPackManager, RENAME_SUFFIX, SelectedFile};
use mythicpack::{
    GameData, ImportOptions, ImportResults, ImportSelection, ImportSource, Pack, PackImporter,
    StateManager,
};
use std::sync::Arc;

fn destination() -> Pack {
    let mut pack = Pack::new("MyPack");
    let mut container = FileContainer::new("existing.yml", "Skills/existing.yml");
    container.entries.push(PackEntry::Skill(SkillEntry {
        name: "Fireball".to_string(),
        internal_name: "Fireball".to_string(),
        cooldown: Some(5.0),
        skills: vec!["damage{a=1} @target".to_string()],
        ..SkillEntry::default()
    }));
    pack.skills.push(container);
    pack
}

async fn import_with(
    policy: DuplicatePolicy,
    skill_name: &str,
) -> (ImportResults, MemoryPackManager) {
    let source = ImportSource::FileList(vec![SelectedFile::new(
        "MyPack/Skills/fireball.yml",
        format!("{}:\n  Skills:\n  - damage{{a=10}} @target\n", skill_name),
    )]);

    let importer =
        PackImporter::new(Arc::new(GameData::default().tables()), StateManager::new());
    let preview = importer.start_import(Some(source)).await.unwrap().unwrap();

    let options = ImportOptions {
        duplicates: policy,
        ..ImportOptions::default()
    };
    let mut manager = MemoryPackManager::new().with_pack(destination());
    let results = importer
        .handle_import(&preview, &ImportSelection::all(), &options, &mut manager)
        .await
        .unwrap();
    (results, manager)
}

fn skill_names(pack: &Pack) -> Vec<(String, String)> {
    pack.collection(FolderType::Skills)
        .iter()
        .flat_map(|container| {
            container
                .entries
                .iter()
                .map(move |entry| (container.file_name.clone(), entry.name().to_string()))
        })
        .collect()
}

#[tokio::test]
async fn test_skip_leaves_destination_unchanged() {
    let (results, manager) = import_with(DuplicatePolicy::Skip, "Fireball").await;

    assert_eq!(results.total_skipped, 1);
    assert_eq!(results.total_imported, 0);
    assert_eq!(manager.pack("MyPack"), Some(&destination()));
}

#[tokio::test]
async fn test_replace_keeps_container_position() {
    let (results, manager) = import_with(DuplicatePolicy::Replace, "Fireball").await;
    assert_eq!(results.total_imported, 1);

    let pack = manager.pack("MyPack").unwrap();
    assert_eq!(
        skill_names(pack),
        vec![("existing.yml".to_string(), "Fireball".to_string())]
    );
    let PackEntry::Skill(skill) = &pack.skills[0].entries[0] else {
        panic!("expected a skill entry");
    };
    assert_eq!(skill.skills, vec!["damage{a=10} @target".to_string()]);
    assert_eq!(skill.cooldown, None);
}

#[tokio::test]
async fn test_rename_adds_suffixed_entry() {
    let (results, manager) = import_with(DuplicatePolicy::Rename, "Fireball").await;
    assert_eq!(results.total_imported, 1);

    let pack = manager.pack("MyPack").unwrap();
    let renamed = format!("Fireball{}", RENAME_SUFFIX);
    assert_eq!(
        skill_names(pack),
        vec![
            ("existing.yml".to_string(), "Fireball".to_string()),
            ("fireball.yml".to_string(), renamed.clone()),
        ]
    );
    assert_eq!(pack.skills[1].entries[0].internal_name(), renamed);

    // The original is untouched.
    assert_eq!(pack.skills[0], destination().skills[0]);
}

#[tokio::test]
async fn test_duplicate_detection_ignores_case() {
    let (results, manager) = import_with(DuplicatePolicy::Skip, "FIREBALL").await;

    assert_eq!(results.total_skipped, 1);
    assert_eq!(skill_names(manager.pack("MyPack").unwrap()).len(), 1);
}
