//! Merge of one validated pack into a destination [`Pack`].

use crate::models::{
    DuplicatePolicy, EntryFailure, EntryValidation, FileContainer, FileImportResult, FolderType,
    GameTables, ImportOptions, ImportSelection, MissingReferencePolicy, Pack, PackEntry,
    PackImportResult, PackParseResults, ParseErrorPolicy, ParsedFile, PlaceholderRecord,
    ValidationResults,
};
use crate::services::converter::EntryConverter;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub const RENAME_SUFFIX: &str = "_imported";
pub const PLACEHOLDER_FILE: &str = "_placeholders.yml";

/// Kinds that receive placeholder stubs for unresolved references.
const PLACEHOLDER_KINDS: [FolderType; 3] =
    [FolderType::Skills, FolderType::Items, FolderType::DropTables];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecuteError {
    #[error("Import of pack \"{pack}\" stopped: {file} failed to parse")]
    ParseErrorStop { pack: String, file: String },
}

/// Where an existing entry with a clashing name lives.
enum Existing {
    Staged(usize),
    Destination { container: usize, entry: usize },
}

pub struct ImportExecutor {
    converter: EntryConverter,
}

impl ImportExecutor {
    pub fn new(tables: Arc<GameTables>) -> Self {
        Self {
            converter: EntryConverter::new(tables),
        }
    }

    /// Merge `parse` into `destination`.
    ///
    /// `on_file` is called with each source file's relative path once it has
    /// been processed. On [`ExecuteError`] `destination` may be partially
    /// modified; callers discard it.
    pub fn import_pack<F>(
        &self,
        parse: &PackParseResults,
        validation: &ValidationResults,
        selection: &ImportSelection,
        options: &ImportOptions,
        destination: &mut Pack,
        mut on_file: F,
    ) -> Result<PackImportResult, ExecuteError>
    where
        F: FnMut(&str),
    {
        let pack_name = parse.pack_name.as_str();
        let mut result = PackImportResult {
            pack_name: pack_name.to_string(),
            destination: destination.name.clone(),
            ..PackImportResult::default()
        };

        if destination.packinfo.is_none() {
            destination.packinfo = parse.packinfo.clone();
        }

        let verdicts = validation.entry_index();

        for folder_type in FolderType::ALL {
            for file in parse.files_of(folder_type) {
                if !selection.includes_file(pack_name, &file.relative_path) {
                    tracing::debug!("Excluded {}/{}", pack_name, file.relative_path);
                    continue;
                }

                let file_result = if file.success {
                    self.import_file(
                        pack_name,
                        file,
                        &verdicts,
                        selection,
                        options,
                        destination,
                        &mut result.failures,
                    )
                } else {
                    if options.on_parse_errors == ParseErrorPolicy::Stop {
                        tracing::warn!(
                            "Stopping import of {}: {} failed to parse",
                            pack_name,
                            file.relative_path
                        );
                        return Err(ExecuteError::ParseErrorStop {
                            pack: pack_name.to_string(),
                            file: file.relative_path.clone(),
                        });
                    }
                    tracing::debug!("Skipping unparsed file {}", file.relative_path);
                    FileImportResult {
                        file: file.relative_path.clone(),
                        folder_type: Some(folder_type),
                        skipped: 1,
                        ..FileImportResult::default()
                    }
                };

                result.imported += file_result.imported;
                result.skipped += file_result.skipped;
                result.failed += file_result.failed;
                result.files.push(file_result);
                on_file(&file.relative_path);
            }
        }

        if options.missing_references == MissingReferencePolicy::Placeholder {
            result.placeholders = synthesize_placeholders(pack_name, validation, destination);
        }

        tracing::info!(
            "Imported {} into {}: {} imported, {} skipped, {} failed, {} placeholders",
            pack_name,
            destination.name,
            result.imported,
            result.skipped,
            result.failed,
            result.placeholders.len()
        );
        Ok(result)
    }

    #[allow(clippy::too_many_arguments)]
    fn import_file(
        &self,
        pack_name: &str,
        file: &ParsedFile,
        verdicts: &HashMap<(&str, &str), &EntryValidation>,
        selection: &ImportSelection,
        options: &ImportOptions,
        destination: &mut Pack,
        failures: &mut Vec<EntryFailure>,
    ) -> FileImportResult {
        let folder_type = file.folder_type;
        let mut file_result = FileImportResult {
            file: file.relative_path.clone(),
            folder_type: Some(folder_type),
            ..FileImportResult::default()
        };
        let mut staged = FileContainer::imported_from(
            &file.file_name,
            &file.relative_path,
            &format!("{}/{}", pack_name, file.relative_path),
        );

        for parsed in &file.entries {
            if !selection.includes_entry(pack_name, &file.relative_path, &parsed.name) {
                continue;
            }

            if let Some(verdict) = verdicts.get(&(file.relative_path.as_str(), parsed.name.as_str())) {
                if verdict.has_critical() {
                    tracing::debug!("Skipping {} (critical issues)", parsed.name);
                    file_result.skipped += 1;
                    continue;
                }
                if verdict.has_warnings() && !options.on_warnings {
                    tracing::debug!("Skipping {} (warnings)", parsed.name);
                    file_result.skipped += 1;
                    continue;
                }
            }

            let mut entry = match self.converter.convert(folder_type, parsed) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to convert {} in {}: {}", parsed.name, file.relative_path, e);
                    file_result.failed += 1;
                    failures.push(EntryFailure {
                        file: file.relative_path.clone(),
                        entry: Some(parsed.name.clone()),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            match find_existing(&staged, destination.collection(folder_type), &entry) {
                None => staged.entries.push(entry),
                Some(existing) => match options.duplicates {
                    DuplicatePolicy::Skip => {
                        tracing::debug!("Skipping duplicate {}", entry.name());
                        file_result.skipped += 1;
                        continue;
                    }
                    DuplicatePolicy::Replace => {
                        tracing::debug!("Replacing {}", entry.name());
                        match existing {
                            Existing::Staged(index) => staged.entries[index] = entry,
                            Existing::Destination { container, entry: index } => {
                                destination.collection_mut(folder_type)[container].entries[index] = entry;
                            }
                        }
                    }
                    DuplicatePolicy::Rename => {
                        while find_existing(&staged, destination.collection(folder_type), &entry).is_some() {
                            entry.append_suffix(RENAME_SUFFIX);
                        }
                        tracing::debug!("Renamed duplicate to {}", entry.name());
                        staged.entries.push(entry);
                    }
                },
            }
            file_result.imported += 1;
        }

        if !staged.entries.is_empty() {
            merge_container(destination.collection_mut(folder_type), staged);
        }
        file_result
    }
}

fn find_existing(staged: &FileContainer, collection: &[FileContainer], entry: &PackEntry) -> Option<Existing> {
    let clashes = |existing: &PackEntry| {
        existing.matches_name(entry.name()) || existing.matches_name(entry.internal_name())
    };

    if let Some(index) = staged.entries.iter().position(clashes) {
        return Some(Existing::Staged(index));
    }
    collection.iter().enumerate().find_map(|(container, file)| {
        file.entries
            .iter()
            .position(clashes)
            .map(|entry| Existing::Destination { container, entry })
    })
}

/// Append into the container with the same file name, or add a new one.
fn merge_container(collection: &mut Vec<FileContainer>, staged: FileContainer) {
    match collection.iter_mut().find(|c| c.file_name == staged.file_name) {
        Some(existing) => existing.entries.extend(staged.entries),
        None => collection.push(staged),
    }
}

/// Stub every missing reference that no entry in `destination` now resolves.
fn synthesize_placeholders(
    pack_name: &str,
    validation: &ValidationResults,
    destination: &mut Pack,
) -> Vec<PlaceholderRecord> {
    let mut created = Vec::new();
    let missing = &validation.cross_references.missing_references;

    for kind in PLACEHOLDER_KINDS {
        let Some(names) = missing.get(kind) else {
            continue;
        };
        let mut container = FileContainer::imported_from(
            PLACEHOLDER_FILE,
            &format!("{}/{}", kind.folder_name(), PLACEHOLDER_FILE),
            &format!("{}/{}", pack_name, kind.folder_name()),
        );

        for name in names {
            if destination.contains_entry(kind, name)
                || container.find_entry(name).is_some()
            {
                continue;
            }
            if let Some(stub) = PackEntry::placeholder(kind, name) {
                tracing::debug!("Placeholder {} {}", kind.label(), name);
                container.entries.push(stub);
                created.push(PlaceholderRecord {
                    pack: destination.name.clone(),
                    folder_type: kind,
                    name: name.clone(),
                });
            }
        }

        if !container.entries.is_empty() {
            merge_container(destination.collection_mut(kind), container);
        }
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameData, SkillEntry};
    use crate::services::parser::YamlFileParser;
    use crate::services::validator::DataValidator;

    fn tables() -> Arc<GameTables> {
        Arc::new(GameData::default().tables())
    }

    fn prepare(files: &[(&str, FolderType, &str)]) -> (PackParseResults, ValidationResults) {
        let parser = YamlFileParser::new();
        let parsed = files
            .iter()
            .map(|(path, folder, text)| parser.parse(text, path, *folder))
            .collect();
        let parse = PackParseResults::new("Source", None, parsed);
        let validation = DataValidator::new(tables()).validate_pack(&parse);
        (parse, validation)
    }

    fn run(
        files: &[(&str, FolderType, &str)],
        options: &ImportOptions,
        destination: &mut Pack,
    ) -> Result<PackImportResult, ExecuteError> {
        let (parse, validation) = prepare(files);
        ImportExecutor::new(tables()).import_pack(
            &parse,
            &validation,
            &ImportSelection::all(),
            options,
            destination,
            |_| {},
        )
    }

    fn destination_with_fireball() -> Pack {
        let mut pack = Pack::new("Dest");
        let mut container = FileContainer::new("spells.yml", "Skills/spells.yml");
        container.entries.push(PackEntry::Skill(SkillEntry {
            cooldown: Some(1.0),
            ..SkillEntry::named("Other")
        }));
        container.entries.push(PackEntry::Skill(SkillEntry {
            cooldown: Some(5.0),
            ..SkillEntry::named("Fireball")
        }));
        pack.skills.push(container);
        pack
    }

    const FIREBALL: (&str, FolderType, &str) = (
        "Skills/fire.yml",
        FolderType::Skills,
        "Fireball:\n  Cooldown: 9\n  Skills:\n  - damage{a=10} @target\n",
    );

    fn with_duplicates(duplicates: DuplicatePolicy) -> ImportOptions {
        ImportOptions {
            duplicates,
            ..ImportOptions::default()
        }
    }

    #[test]
    fn test_duplicate_skip() {
        let mut dest = destination_with_fireball();
        let before = dest.clone();
        let result = run(&[FIREBALL], &with_duplicates(DuplicatePolicy::Skip), &mut dest).unwrap();
        assert_eq!(result.skipped, 1);
        assert_eq!(result.imported, 0);
        assert_eq!(dest, before);
    }

    #[test]
    fn test_duplicate_replace_keeps_position() {
        let mut dest = destination_with_fireball();
        let result = run(&[FIREBALL], &with_duplicates(DuplicatePolicy::Replace), &mut dest).unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(dest.skills.len(), 1);
        let PackEntry::Skill(skill) = &dest.skills[0].entries[1] else {
            panic!("expected a skill");
        };
        assert_eq!(skill.name, "Fireball");
        assert_eq!(skill.cooldown, Some(9.0));
    }

    #[test]
    fn test_duplicate_rename() {
        let mut dest = destination_with_fireball();
        run(&[FIREBALL], &with_duplicates(DuplicatePolicy::Rename), &mut dest).unwrap();

        let names: Vec<&str> = dest
            .skills
            .iter()
            .flat_map(|c| &c.entries)
            .map(PackEntry::name)
            .collect();
        assert_eq!(names.iter().filter(|n| **n == "Fireball_imported").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "Fireball").count(), 1);
        let PackEntry::Skill(original) = &dest.skills[0].entries[1] else {
            panic!("expected a skill");
        };
        assert_eq!(original.cooldown, Some(5.0));
    }

    #[test]
    fn test_duplicate_within_same_file_is_case_insensitive() {
        let mut dest = Pack::new("Dest");
        let result = run(
            &[("Skills/a.yml", FolderType::Skills, "Heal:\n  Skills:\n  - heal{a=1}\nHEAL:\n  Skills:\n  - heal{a=2}\n")],
            &ImportOptions::default(),
            &mut dest,
        )
        .unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_containers_merge_by_file_name() {
        let mut dest = destination_with_fireball();
        run(
            &[("Skills/spells.yml", FolderType::Skills, "Frost:\n  Skills:\n  - damage{a=2} @target\n")],
            &ImportOptions::default(),
            &mut dest,
        )
        .unwrap();
        assert_eq!(dest.skills.len(), 1);
        assert_eq!(dest.skills[0].entries.len(), 3);
    }

    #[test]
    fn test_critical_and_warning_gates() {
        let files = [(
            "Mobs/m.yml",
            FolderType::Mobs,
            "NoType:\n  Health: 5\nWeak:\n  Type: ZOMBIE\n  Health: 0\nFine:\n  Type: ZOMBIE\n",
        )];

        let mut dest = Pack::new("Dest");
        let result = run(&files, &ImportOptions::default(), &mut dest).unwrap();
        assert_eq!((result.imported, result.skipped), (2, 1));

        let strict = ImportOptions {
            on_warnings: false,
            ..ImportOptions::default()
        };
        let mut dest = Pack::new("Dest");
        let result = run(&files, &strict, &mut dest).unwrap();
        assert_eq!((result.imported, result.skipped), (1, 2));
        assert!(dest.contains_entry(FolderType::Mobs, "Fine"));
    }

    #[test]
    fn test_conversion_failure_does_not_stop_file() {
        let mut dest = Pack::new("Dest");
        let result = run(
            &[("Skills/s.yml", FolderType::Skills, "Odd: just text\nGood:\n  Skills:\n  - heal{a=1}\n")],
            &ImportOptions::default(),
            &mut dest,
        )
        .unwrap();
        assert_eq!(result.failed, 1);
        assert_eq!(result.imported, 1);
        assert_eq!(result.failures[0].entry.as_deref(), Some("Odd"));
    }

    #[test]
    fn test_parse_error_policies() {
        let files = [
            ("Mobs/bad.yml", FolderType::Mobs, "Boss:\n  Skills: [oops\n"),
            ("Skills/ok.yml", FolderType::Skills, "Heal:\n  Skills:\n  - heal{a=1}\n"),
        ];

        let mut dest = Pack::new("Dest");
        let result = run(&files, &ImportOptions::default(), &mut dest).unwrap();
        assert_eq!(result.skipped, 1);
        assert_eq!(result.imported, 1);

        let stop = ImportOptions {
            on_parse_errors: ParseErrorPolicy::Stop,
            ..ImportOptions::default()
        };
        let err = run(&files, &stop, &mut Pack::new("Dest")).unwrap_err();
        assert_eq!(
            err,
            ExecuteError::ParseErrorStop {
                pack: "Source".to_string(),
                file: "Mobs/bad.yml".to_string()
            }
        );
    }

    #[test]
    fn test_placeholders_for_unresolved_references() {
        let files = [(
            "Mobs/m.yml",
            FolderType::Mobs,
            "Boss:\n  Type: ZOMBIE\n  Skills:\n  - skill{s=Heal}\n  Drops:\n  - Trophy 1 1\n",
        )];

        let mut dest = Pack::new("Dest");
        let result = run(&files, &ImportOptions::default(), &mut dest).unwrap();
        assert_eq!(result.placeholders.len(), 2);

        let container = dest.find_container(FolderType::Skills, PLACEHOLDER_FILE).unwrap();
        assert_eq!(container.relative_path, "Skills/_placeholders.yml");
        assert_eq!(container.entries.len(), 1);
        assert_eq!(container.entries[0].name(), "Heal");
        assert!(container.entries[0].is_placeholder());
        assert!(dest.contains_entry(FolderType::Items, "Trophy"));
        assert!(dest.droptables.is_empty());

        let skip = ImportOptions {
            missing_references: MissingReferencePolicy::Skip,
            ..ImportOptions::default()
        };
        let mut dest = Pack::new("Dest");
        let result = run(&files, &skip, &mut dest).unwrap();
        assert!(result.placeholders.is_empty());
        assert!(dest.skills.is_empty());
    }

    #[test]
    fn test_placeholder_not_created_when_destination_defines_name() {
        let mut dest = Pack::new("Dest");
        let mut container = FileContainer::new("heal.yml", "Skills/heal.yml");
        container.entries.push(PackEntry::Skill(SkillEntry::named("heal")));
        dest.skills.push(container);

        let result = run(
            &[("Mobs/m.yml", FolderType::Mobs, "Boss:\n  Type: ZOMBIE\n  Skills:\n  - skill{s=Heal}\n")],
            &ImportOptions::default(),
            &mut dest,
        )
        .unwrap();
        assert!(result.placeholders.is_empty());
    }

    #[test]
    fn test_selection_excludes_entries() {
        let (parse, validation) = prepare(&[(
            "Skills/s.yml",
            FolderType::Skills,
            "A:\n  Skills:\n  - heal{a=1}\nB:\n  Skills:\n  - heal{a=1}\n",
        )]);
        let selection = ImportSelection::all().exclude_entry("Source", "Skills/s.yml", "B");
        let mut dest = Pack::new("Dest");
        let mut seen = Vec::new();
        let result = ImportExecutor::new(tables())
            .import_pack(&parse, &validation, &selection, &ImportOptions::default(), &mut dest, |f| {
                seen.push(f.to_string())
            })
            .unwrap();
        assert_eq!(result.imported, 1);
        assert!(!dest.contains_entry(FolderType::Skills, "B"));
        assert_eq!(seen, vec!["Skills/s.yml"]);
    }
}
