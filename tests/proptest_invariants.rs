//! Property tests for parse and validation invariants
//!
//! - An entry is valid exactly when it carries no critical issue, and the
//!   pack summary agrees with the per-entry verdicts
//! - A mob with neither a type nor a template is never valid
//! - A repeated top-level key is reported once, at the right lines, and the
//!   last definition wins

use mythicpack::models::{FolderType, PackParseResults, ParseIssueKind, Severity};
use mythicpack::services::{DataValidator, YamlFileParser};
use mythicpack::GameData;
use proptest::prelude::*;
use std::sync::Arc;

fn mob_yaml(name: &str, mob_type: &Option<String>, health: &Option<i32>) -> String {
    let mut yaml = format!("{}:\n", name);
    if let Some(mob_type) = mob_type {
        yaml.push_str(&format!("  Type: {}\n", mob_type));
    }
    if let Some(health) = health {
        yaml.push_str(&format!("  Health: {}\n", health));
    }
    yaml.push_str("  Display: 'Grunt'\n");
    yaml
}

fn mob_type() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        "ZOMBIE".to_string(),
        "skeleton".to_string(),
        "WITHER_SKELETON".to_string(),
        "GHOST".to_string(),
        "not_a_mob".to_string(),
    ]))
}

proptest! {
    #[test]
    fn valid_iff_no_critical_issue(
        mobs in prop::collection::vec((mob_type(), prop::option::of(-50i32..200)), 1..8)
    ) {
        let text: String = mobs
            .iter()
            .enumerate()
            .map(|(i, (mob_type, health))| mob_yaml(&format!("Mob{}", i), mob_type, health))
            .collect();

        let parser = YamlFileParser::new();
        let file = parser.parse(&text, "Mobs/generated.yml", FolderType::Mobs);
        prop_assert!(file.success);

        let parse = PackParseResults::new("Generated", None, vec![file]);
        let results = DataValidator::new(Arc::new(GameData::default().tables())).validate_pack(&parse);

        let entries: Vec<_> = results.validation_results.iter().flat_map(|f| &f.entries).collect();
        prop_assert_eq!(entries.len(), mobs.len());
        for (entry, (mob_type, _)) in entries.iter().zip(&mobs) {
            let has_critical = entry.issues.iter().any(|i| i.severity == Severity::Critical);
            prop_assert_eq!(entry.valid, !has_critical);
            if mob_type.is_none() {
                prop_assert!(!entry.valid, "{} has no type and no template", entry.name);
            }
        }

        let summary = &results.summary;
        prop_assert_eq!(summary.total_entries, mobs.len());
        prop_assert_eq!(summary.valid_entries + summary.entries_with_errors, summary.total_entries);
        prop_assert_eq!(
            summary.entries_with_errors,
            entries.iter().filter(|e| !e.valid).count()
        );
    }

    #[test]
    fn repeated_key_reported_and_last_wins(fillers in 0usize..10) {
        let mut text = String::from("Dup_Mob:\n  Health: 1\n");
        for i in 0..fillers {
            text.push_str(&format!("filler_{}:\n  Health: 5\n", i));
        }
        text.push_str("Dup_Mob:\n  Health: 2\n");

        let parser = YamlFileParser::new();
        let file = parser.parse(&text, "Mobs/dup.yml", FolderType::Mobs);
        prop_assert!(file.success);

        let duplicates: Vec<_> = file
            .warnings
            .iter()
            .filter(|w| w.kind == ParseIssueKind::DuplicateKey)
            .collect();
        prop_assert_eq!(duplicates.len(), 1);
        prop_assert_eq!(duplicates[0].key.as_deref(), Some("Dup_Mob"));
        prop_assert_eq!(duplicates[0].first_line, Some(1));
        prop_assert_eq!(duplicates[0].line, Some(3 + 2 * fillers));

        let entry = file.entry("Dup_Mob");
        prop_assert!(entry.is_some());
        let health = entry.and_then(|e| e.data.get("Health")).and_then(|h| h.as_i64());
        prop_assert_eq!(health, Some(2));
        prop_assert_eq!(file.entries.len(), fillers + 1);
    }
}
