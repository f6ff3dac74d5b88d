//! Cross-reference validation for one parsed pack.
//!
//! Runs in two passes. The collection pass records every defined entity name
//! per folder type (and which files failed to parse); the validation pass runs
//! the per-type rules and resolves every outbound reference against those
//! sets, so file order never matters.

use crate::models::drop::strip_list_marker;
use crate::models::record::{CiRecord, scalar_to_string, value_to_f64, value_to_lines};
use crate::models::{
    CrossReferences, DropDefinition, DropKind, EntryValidation, FileValidation, FolderType,
    GameTables, IssueKind, PackParseResults, ParsedEntry, Severity, ValidationIssue,
    ValidationResults, ValidationSummary,
};
use crate::services::references::{
    Reference, parse_condition_line, parse_enchantment, parse_equipment, parse_skill_line,
};
use serde_yaml_ng::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

const SPAWN_ACTIONS: [&str; 4] = ["ADD", "REPLACE", "DENY", "SCALE"];

/// Names defined in one folder type. Exact lookup first, then case-folded.
#[derive(Debug, Default)]
struct NameSet {
    exact: HashSet<String>,
    folded: HashSet<String>,
}

impl NameSet {
    fn insert(&mut self, name: &str) {
        self.exact.insert(name.to_string());
        self.folded.insert(name.to_ascii_lowercase());
    }

    fn contains(&self, name: &str) -> bool {
        self.exact.contains(name) || self.folded.contains(&name.to_ascii_lowercase())
    }
}

#[derive(Debug, Default)]
struct DefinedNames {
    sets: HashMap<FolderType, NameSet>,
}

impl DefinedNames {
    fn insert(&mut self, kind: FolderType, name: &str) {
        self.sets.entry(kind).or_default().insert(name);
    }

    fn contains(&self, kind: FolderType, name: &str) -> bool {
        self.sets.get(&kind).map(|set| set.contains(name)).unwrap_or(false)
    }
}

/// Validates parsed packs against [`GameTables`] and each other.
pub struct DataValidator {
    tables: Arc<GameTables>,
}

impl DataValidator {
    pub fn new(tables: Arc<GameTables>) -> Self {
        Self { tables }
    }

    pub fn validate_pack(&self, parse: &PackParseResults) -> ValidationResults {
        self.validate_pack_with_progress(parse, |_, _, _| {})
    }

    /// Validate every entry of a pack. `progress` receives
    /// `(files_done, total_files, relative_path)` after each file.
    pub fn validate_pack_with_progress<F>(
        &self,
        parse: &PackParseResults,
        mut progress: F,
    ) -> ValidationResults
    where
        F: FnMut(usize, usize, &str),
    {
        // Collection pass
        let mut defined = DefinedNames::default();
        let mut files_with_errors: BTreeMap<FolderType, Vec<String>> = BTreeMap::new();
        for file in &parse.files {
            if !file.success {
                files_with_errors
                    .entry(file.folder_type)
                    .or_default()
                    .push(file.relative_path.clone());
                continue;
            }
            for entry in &file.entries {
                defined.insert(file.folder_type, &entry.name);
            }
        }

        // Validation pass
        let mut cross_references = CrossReferences::default();
        let mut validation_results = Vec::new();
        let total = parse.files.len();

        for (index, file) in parse.files.iter().enumerate() {
            if file.success {
                let entries = file
                    .entries
                    .iter()
                    .map(|entry| {
                        let mut check = EntryCheck {
                            tables: &self.tables,
                            defined: &defined,
                            broken: &files_with_errors,
                            refs: &mut cross_references,
                            issues: Vec::new(),
                        };
                        check.run(file.folder_type, entry);
                        EntryValidation::new(&entry.name, check.issues)
                    })
                    .collect();

                validation_results.push(FileValidation {
                    file: file.relative_path.clone(),
                    folder_type: file.folder_type,
                    entries,
                });
            }
            progress(index + 1, total, &file.relative_path);
        }

        let summary = summarize(&validation_results);
        tracing::info!(
            "Validated {}: {} entries, {} valid, {} critical, {} warnings, {} info",
            parse.pack_name,
            summary.total_entries,
            summary.valid_entries,
            summary.critical_errors,
            summary.warnings,
            summary.info
        );

        ValidationResults {
            pack_name: parse.pack_name.clone(),
            validation_results,
            summary,
            cross_references,
            files_with_errors,
        }
    }
}

fn summarize(files: &[FileValidation]) -> ValidationSummary {
    let mut summary = ValidationSummary::default();
    for entry in files.iter().flat_map(|f| &f.entries) {
        summary.total_entries += 1;
        if entry.valid {
            summary.valid_entries += 1;
            if entry.has_warnings() {
                summary.entries_with_warnings += 1;
            }
        } else {
            summary.entries_with_errors += 1;
        }
        summary.critical_errors += entry.count(Severity::Critical);
        summary.warnings += entry.count(Severity::Warning);
        summary.info += entry.count(Severity::Info);
    }
    summary
}

/// Rule runner for a single entry.
struct EntryCheck<'a> {
    tables: &'a GameTables,
    defined: &'a DefinedNames,
    broken: &'a BTreeMap<FolderType, Vec<String>>,
    refs: &'a mut CrossReferences,
    issues: Vec<ValidationIssue>,
}

impl EntryCheck<'_> {
    fn run(&mut self, folder_type: FolderType, entry: &ParsedEntry) {
        let Some(record) = CiRecord::from_value(&entry.data) else {
            self.warning(
                IssueKind::InvalidValue,
                "",
                format!("\"{}\" is not a mapping of fields", entry.name),
                "Write the definition as `Name:` followed by indented fields",
            );
            return;
        };

        match folder_type {
            FolderType::Mobs => self.check_mob(&record),
            FolderType::Skills => self.check_skill(&record),
            FolderType::Items => self.check_item(&record),
            FolderType::DropTables => self.check_droptable(&record),
            FolderType::RandomSpawns => self.check_randomspawn(&record),
        }
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    fn critical(&mut self, kind: IssueKind, field: &str, message: impl Into<String>, suggestion: &str) {
        self.push(ValidationIssue::new(kind, Severity::Critical, field, message).with_suggestion(suggestion));
    }

    fn warning(&mut self, kind: IssueKind, field: &str, message: impl Into<String>, suggestion: &str) {
        self.push(ValidationIssue::new(kind, Severity::Warning, field, message).with_suggestion(suggestion));
    }

    fn info(&mut self, kind: IssueKind, field: &str, message: impl Into<String>, suggestion: &str) {
        self.push(ValidationIssue::new(kind, Severity::Info, field, message).with_suggestion(suggestion));
    }

    /// Hint naming files of `kind` that failed to parse, if any.
    fn broken_file_hint(&self, kinds: &[FolderType]) -> Option<String> {
        let files: Vec<&str> = kinds
            .iter()
            .filter_map(|kind| self.broken.get(kind))
            .flatten()
            .map(String::as_str)
            .collect();
        if files.is_empty() {
            None
        } else {
            Some(format!(
                "this missing reference might exist in a file that failed to parse: {}",
                files.join(", ")
            ))
        }
    }

    /// Record a reference and flag it when nothing defines it.
    fn resolve(&mut self, field: &str, reference: &Reference) {
        let Reference { kind, name } = reference;
        self.refs.all_references.insert(*kind, name);
        if self.defined.contains(*kind, name) {
            self.refs.resolved_references.insert(*kind, name);
            return;
        }
        self.refs.missing_references.insert(*kind, name);

        let mut suggestion = format!(
            "Define {} \"{}\" in {}/, fix the spelling, or import with placeholders",
            kind.label(),
            name,
            kind.folder_name()
        );
        if let Some(hint) = self.broken_file_hint(&[*kind]) {
            suggestion = format!("{}; {}", suggestion, hint);
        }
        self.push(
            ValidationIssue::new(
                IssueKind::MissingReference,
                Severity::Warning,
                field,
                format!("Referenced {} \"{}\" was not found", kind.label(), name),
            )
            .with_value(name.as_str())
            .with_suggestion(suggestion),
        );
    }

    fn check_color_codes(&mut self, field: &str, text: &str) {
        if let Some(problem) = color_code_problem(text) {
            self.push(
                ValidationIssue::new(
                    IssueKind::InvalidColorCode,
                    Severity::Info,
                    field,
                    format!("Invalid color code \"{}\"", problem),
                )
                .with_value(text)
                .with_suggestion("Use &0-&9, &a-&f, &k-&o, &r or &#RRGGBB"),
            );
        }
    }

    fn check_skill_lines(&mut self, field: &str, lines: &[String]) {
        for (index, line) in lines.iter().enumerate() {
            let field = format!("{}[{}]", field, index);
            match parse_skill_line(line, self.tables) {
                Ok(parsed) => {
                    for reference in &parsed.references {
                        self.resolve(&field, reference);
                    }
                }
                Err(problem) => self.push(
                    ValidationIssue::new(
                        IssueKind::InvalidValue,
                        Severity::Warning,
                        field.as_str(),
                        format!("Malformed skill line: {}", problem),
                    )
                    .with_value(line.as_str())
                    .with_suggestion("Use `- mechanic{option=value} @targeter ~trigger`"),
                ),
            }
        }
    }

    fn check_condition_lines(&mut self, field: &str, lines: &[String]) {
        for (index, line) in lines.iter().enumerate() {
            let field = format!("{}[{}]", field, index);
            match parse_condition_line(line, self.tables) {
                Ok(parsed) => {
                    for reference in &parsed.references {
                        self.resolve(&field, reference);
                    }
                }
                Err(problem) => self.push(
                    ValidationIssue::new(
                        IssueKind::InvalidCondition,
                        Severity::Warning,
                        field.as_str(),
                        format!("Invalid condition: {}", problem),
                    )
                    .with_value(line.as_str())
                    .with_suggestion("Use `- condition{option=value} true|false|power N|cast Skill`"),
                ),
            }
        }
    }

    fn check_drop_lines(&mut self, lines: &[String]) {
        for (index, line) in lines.iter().enumerate() {
            let field = format!("Drops[{}]", index);
            let Some(drop) = DropDefinition::parse(line) else {
                continue;
            };

            if !drop.amount_is_valid() {
                self.push(
                    ValidationIssue::new(
                        IssueKind::InvalidDrop,
                        Severity::Warning,
                        field.as_str(),
                        format!("Invalid drop amount \"{}\"", drop.amount),
                    )
                    .with_value(line.as_str())
                    .with_suggestion("Use a number or a range such as 1-3"),
                );
            }
            if drop.chance_value().is_none() {
                self.push(
                    ValidationIssue::new(
                        IssueKind::InvalidDrop,
                        Severity::Warning,
                        field.as_str(),
                        format!("Invalid drop chance \"{}\"", drop.chance),
                    )
                    .with_value(line.as_str())
                    .with_suggestion("Use a decimal chance such as 0.5"),
                );
            }

            let explicit_item = drop_base(line).eq_ignore_ascii_case("mythicitem");
            match (drop.kind, drop.item.as_deref(), drop.table.as_deref(), drop.mob.as_deref()) {
                (DropKind::DropTable, _, Some(table), _) => {
                    self.resolve(&field, &Reference::new(FolderType::DropTables, table));
                }
                (DropKind::MythicMob, _, _, Some(mob)) => {
                    self.resolve(&field, &Reference::new(FolderType::Mobs, mob));
                }
                (DropKind::MythicItem, Some(item), _, _) if explicit_item => {
                    self.resolve(&field, &Reference::new(FolderType::Items, item));
                }
                (DropKind::DropTable | DropKind::MythicMob | DropKind::MythicItem, None, None, None) => {
                    self.warning(
                        IssueKind::InvalidDrop,
                        &field,
                        format!("Drop \"{}\" does not name its target", line.trim()),
                        "Add the target, e.g. droptable{dt=Name} or mythicitem{i=Name}",
                    );
                }
                (DropKind::Item | DropKind::MythicItem, Some(name), _, _) => {
                    self.resolve_bare_drop(&field, name, drop.kind == DropKind::Item);
                }
                _ => {}
            }
        }
    }

    /// A bare drop name may be a drop table, a custom item or a vanilla
    /// material. Unresolved names are recorded under items only.
    fn resolve_bare_drop(&mut self, field: &str, name: &str, vanilla_style: bool) {
        if self.defined.contains(FolderType::DropTables, name) {
            self.refs.all_references.insert(FolderType::DropTables, name);
            self.refs.resolved_references.insert(FolderType::DropTables, name);
            return;
        }
        if self.defined.contains(FolderType::Items, name) {
            self.refs.all_references.insert(FolderType::Items, name);
            self.refs.resolved_references.insert(FolderType::Items, name);
            return;
        }
        if vanilla_style && self.tables.is_material(name) {
            return;
        }

        self.refs.all_references.insert(FolderType::Items, name);
        self.refs.missing_references.insert(FolderType::Items, name);

        let mut suggestion = format!(
            "Define an item \"{}\" in Items/ or a drop table \"{}\" in DropTables/",
            name, name
        );
        if let Some(hint) = self.broken_file_hint(&[FolderType::Items, FolderType::DropTables]) {
            suggestion = format!("{}; {}", suggestion, hint);
        }
        self.push(
            ValidationIssue::new(
                IssueKind::MissingReference,
                Severity::Warning,
                field,
                format!("Drop \"{}\" is neither a known item nor a known drop table", name),
            )
            .with_value(name)
            .with_suggestion(suggestion),
        );
    }

    fn check_mob(&mut self, record: &CiRecord) {
        let mob_type = record
            .get_any(&["MobType", "Type"])
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty());
        let template = record
            .get_string("Template")
            .filter(|s| !s.trim().is_empty());

        match (&mob_type, &template) {
            (None, None) => self.critical(
                IssueKind::MissingRequiredField,
                "MobType",
                "Mob has neither a MobType nor a Template",
                "Add `Type: ZOMBIE` (or another entity type) or `Template: <mob>`",
            ),
            (Some(mob_type), _) if !self.tables.is_entity_type(mob_type) => self.push(
                ValidationIssue::new(
                    IssueKind::InvalidEntityType,
                    Severity::Warning,
                    "MobType",
                    format!("Unknown entity type \"{}\"", mob_type),
                )
                .with_value(mob_type.as_str())
                .with_suggestion("Use a Minecraft entity type such as ZOMBIE or SKELETON"),
            ),
            _ => {}
        }

        if let Some(template) = &template {
            for name in template.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                self.resolve("Template", &Reference::new(FolderType::Mobs, name));
            }
        }

        if let Some(value) = record.get("Health") {
            if !value_to_f64(value).is_some_and(|h| h > 0.0) {
                self.warning(
                    IssueKind::InvalidValue,
                    "Health",
                    format!("Health must be a positive number, got {}", display_value(value)),
                    "Set Health to a number greater than 0",
                );
            }
        }
        if let Some(value) = record.get("Damage") {
            if !value_to_f64(value).is_some_and(|d| d >= 0.0) {
                self.warning(
                    IssueKind::InvalidValue,
                    "Damage",
                    format!("Damage must be a non-negative number, got {}", display_value(value)),
                    "Set Damage to 0 or more",
                );
            }
        }

        if let Some(display) = record.get_string("Display") {
            self.check_color_codes("Display", &display);
        }

        self.check_skill_lines("Skills", &record.get_lines("Skills"));

        if let Some(equipment) = record.get("Equipment") {
            for (slot, item) in parse_equipment(equipment) {
                if !slot.is_empty() && !self.tables.is_equipment_slot(&slot) {
                    self.push(
                        ValidationIssue::new(
                            IssueKind::InvalidValue,
                            Severity::Warning,
                            "Equipment",
                            format!("Unknown equipment slot \"{}\"", slot),
                        )
                        .with_value(format!("{} {}", item, slot))
                        .with_suggestion("Use HEAD, CHEST, LEGS, FEET, HAND or OFFHAND"),
                    );
                }
                if !item.is_empty() && !self.tables.is_material(&item) {
                    self.resolve("Equipment", &Reference::new(FolderType::Items, item));
                }
            }
        }

        self.check_drop_lines(&record.get_lines("Drops"));

        if let Some(options) = record.get("Options") {
            match options {
                Value::Mapping(mapping) => {
                    for key in mapping.keys().filter_map(scalar_to_string) {
                        if !self.tables.is_mob_option(&key) {
                            self.push(
                                ValidationIssue::new(
                                    IssueKind::InvalidOption,
                                    Severity::Warning,
                                    format!("Options.{}", key),
                                    format!("Unknown mob option \"{}\"", key),
                                )
                                .with_value(key.as_str())
                                .with_suggestion("Check the option name against the MythicMobs option list"),
                            );
                        }
                    }
                }
                Value::Null => {}
                _ => self.warning(
                    IssueKind::InvalidValue,
                    "Options",
                    "Options must be a mapping",
                    "Write options as indented `Name: value` pairs",
                ),
            }
        }
    }

    fn check_skill(&mut self, record: &CiRecord) {
        let has_content = ["Skills", "Conditions", "TargetConditions"]
            .iter()
            .any(|field| record.get(field).is_some_and(|v| !value_to_lines(v).is_empty()));
        if !has_content {
            self.info(
                IssueKind::MissingContent,
                "Skills",
                "Skill has no Skills, Conditions or TargetConditions",
                "Add at least one mechanic line under Skills",
            );
        }

        if let Some(value) = record.get("Cooldown") {
            if !value_to_f64(value).is_some_and(|c| c >= 0.0) {
                self.warning(
                    IssueKind::InvalidValue,
                    "Cooldown",
                    format!("Cooldown must be a non-negative number, got {}", display_value(value)),
                    "Set Cooldown to a number of seconds, 0 or more",
                );
            }
        }

        self.check_skill_lines("Skills", &record.get_lines("Skills"));
        for field in ["Conditions", "TargetConditions", "TriggerConditions"] {
            self.check_condition_lines(field, &record.get_lines(field));
        }
    }

    fn check_item(&mut self, record: &CiRecord) {
        match record.get_string("Id").filter(|s| !s.trim().is_empty()) {
            None => self.critical(
                IssueKind::MissingRequiredField,
                "Id",
                "Item has no Id",
                "Add `Id: <material>`, e.g. `Id: DIAMOND_SWORD`",
            ),
            Some(id) if !self.tables.is_material(&id) => self.push(
                ValidationIssue::new(
                    IssueKind::InvalidValue,
                    Severity::Warning,
                    "Id",
                    format!("\"{}\" is not a recognized material", id),
                )
                .with_value(id.as_str())
                .with_suggestion("Use a Minecraft material name; modded materials can be ignored"),
            ),
            Some(_) => {}
        }

        if let Some(value) = record.get("Amount") {
            let in_range = value_to_f64(value)
                .is_some_and(|a| a.fract() == 0.0 && (1.0..=64.0).contains(&a));
            if !in_range {
                self.warning(
                    IssueKind::InvalidValue,
                    "Amount",
                    format!("Amount must be between 1 and 64, got {}", display_value(value)),
                    "Set Amount to a whole number from 1 to 64",
                );
            }
        }

        if let Some(enchantments) = record.get("Enchantments") {
            let values: Vec<&Value> = match enchantments {
                Value::Sequence(items) => items.iter().collect(),
                Value::Null => Vec::new(),
                other => vec![other],
            };
            for (index, value) in values.into_iter().enumerate() {
                let field = format!("Enchantments[{}]", index);
                match parse_enchantment(value) {
                    None => self.warning(
                        IssueKind::InvalidEnchantment,
                        &field,
                        format!("Cannot read enchantment {}", display_value(value)),
                        "Use `NAME LEVEL`, e.g. `SHARPNESS 5`",
                    ),
                    Some((name, level)) => {
                        if !self.tables.is_enchantment(&name) {
                            self.push(
                                ValidationIssue::new(
                                    IssueKind::InvalidEnchantment,
                                    Severity::Warning,
                                    field.as_str(),
                                    format!("Unknown enchantment \"{}\"", name),
                                )
                                .with_value(name.as_str())
                                .with_suggestion("Use an enchantment name such as SHARPNESS or UNBREAKING"),
                            );
                        }
                        if let Some(level) = level.filter(|l| !level_is_valid(l)) {
                            self.push(
                                ValidationIssue::new(
                                    IssueKind::InvalidEnchantment,
                                    Severity::Warning,
                                    field.as_str(),
                                    format!("Invalid enchantment level \"{}\"", level),
                                )
                                .with_value(level.as_str())
                                .with_suggestion("Use a whole number or a range such as 1to3"),
                            );
                        }
                    }
                }
            }
        }

        if let Some(display) = record.get_string("Display") {
            self.check_color_codes("Display", &display);
        }
        for (index, line) in record.get_lines("Lore").iter().enumerate() {
            self.check_color_codes(&format!("Lore[{}]", index), line);
        }
    }

    fn check_droptable(&mut self, record: &CiRecord) {
        let drops = record.get_lines("Drops");
        if drops.is_empty() {
            self.info(
                IssueKind::MissingContent,
                "Drops",
                "Drop table has no drops",
                "Add at least one drop line under Drops",
            );
        }
        self.check_drop_lines(&drops);
        self.check_condition_lines("Conditions", &record.get_lines("Conditions"));
    }

    fn check_randomspawn(&mut self, record: &CiRecord) {
        match record
            .get_any(&["MobType", "Type"])
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
        {
            None => self.critical(
                IssueKind::MissingRequiredField,
                "MobType",
                "Random spawn has no MobType",
                "Add `MobType: <mob>` naming the mob to spawn",
            ),
            Some(types) => {
                for name in types.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    self.resolve("MobType", &Reference::new(FolderType::Mobs, name));
                }
            }
        }

        if let Some(value) = record.get("Chance") {
            if !value_to_f64(value).is_some_and(|c| (0.0..=1.0).contains(&c)) {
                self.warning(
                    IssueKind::InvalidValue,
                    "Chance",
                    format!("Chance must be between 0 and 1, got {}", display_value(value)),
                    "Use a decimal chance such as 0.1",
                );
            }
        }

        if let Some(action) = record.get_string("Action") {
            if !SPAWN_ACTIONS.iter().any(|a| a.eq_ignore_ascii_case(action.trim())) {
                self.push(
                    ValidationIssue::new(
                        IssueKind::InvalidValue,
                        Severity::Warning,
                        "Action",
                        format!("Unknown spawn action \"{}\"", action),
                    )
                    .with_value(action.as_str())
                    .with_suggestion("Use ADD, REPLACE, DENY or SCALE"),
                );
            }
        }

        for biome in record.get_lines("Biomes") {
            if !self.tables.is_biome(&biome) {
                self.push(
                    ValidationIssue::new(
                        IssueKind::InvalidBiome,
                        Severity::Info,
                        "Biomes",
                        format!("Unknown biome \"{}\"", biome),
                    )
                    .with_value(biome.as_str())
                    .with_suggestion("Use a Minecraft biome name such as PLAINS"),
                );
            }
        }

        self.check_condition_lines("Conditions", &record.get_lines("Conditions"));
    }
}

/// First token of a drop line, before any attribute block.
fn drop_base(line: &str) -> &str {
    strip_list_marker(line)
        .split(|c: char| c == '{' || c.is_whitespace())
        .next()
        .unwrap_or("")
}

/// `5`, `1to3` or `1-3`.
fn level_is_valid(level: &str) -> bool {
    let level = level.trim();
    if level.parse::<i64>().is_ok() {
        return true;
    }
    level
        .split_once("to")
        .or_else(|| level.split_once('-'))
        .is_some_and(|(low, high)| low.trim().parse::<i64>().is_ok() && high.trim().parse::<i64>().is_ok())
}

/// The first malformed `&` code in `text`, if any.
fn color_code_problem(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut index = 0;
    while index < chars.len() {
        if chars[index] != '&' || index + 1 >= chars.len() {
            index += 1;
            continue;
        }
        let code = chars[index + 1];
        if code == '#' {
            let hex: String = chars.iter().skip(index + 2).take(6).collect();
            if hex.len() < 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Some(format!("&#{}", hex));
            }
            index += 8;
            continue;
        }
        let valid = code.is_ascii_digit()
            || matches!(code.to_ascii_lowercase(), 'a'..='f' | 'k'..='o' | 'r');
        if !valid && !code.is_whitespace() {
            return Some(format!("&{}", code));
        }
        index += 2;
    }
    None
}

fn display_value(value: &Value) -> String {
    scalar_to_string(value).unwrap_or_else(|| match value {
        Value::Null => "nothing".to_string(),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        _ => "an unsupported value".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameData, ParsedFile};
    use crate::services::parser::YamlFileParser;

    fn validator() -> DataValidator {
        DataValidator::new(Arc::new(GameData::default().tables()))
    }

    fn pack(files: &[(&str, FolderType, &str)]) -> PackParseResults {
        let parser = YamlFileParser::new();
        let parsed: Vec<ParsedFile> = files
            .iter()
            .map(|(path, folder, text)| parser.parse(text, path, *folder))
            .collect();
        PackParseResults::new("Test", None, parsed)
    }

    fn issues<'a>(results: &'a ValidationResults, path: &str, name: &str) -> &'a [ValidationIssue] {
        &results.entry(path, name).unwrap().issues
    }

    #[test]
    fn test_end_to_end_scenario_is_clean() {
        let results = validator().validate_pack(&pack(&[
            ("Mobs/zombie.yml", FolderType::Mobs, "MY_ZOMBIE:\n  MobType: ZOMBIE\n  Skills:\n  - fireball true\n"),
            ("Skills/fireball.yml", FolderType::Skills, "fireball:\n  Skills:\n  - damage{a=10} @target\n"),
        ]));
        assert_eq!(results.summary.total_entries, 2);
        assert_eq!(results.summary.critical_errors, 0);
        assert_eq!(results.summary.warnings, 0);
        assert!(results.cross_references.resolved_references.skills.contains("fireball"));
    }

    #[test]
    fn test_forward_reference_resolves_case_insensitively() {
        let results = validator().validate_pack(&pack(&[
            ("Mobs/a.yml", FolderType::Mobs, "Boss:\n  type: ZOMBIE\n  skills:\n  - fireball true\n"),
            ("Skills/z.yml", FolderType::Skills, "FireBall:\n  Skills:\n  - damage{a=1}\n"),
        ]));
        assert!(
            issues(&results, "Mobs/a.yml", "Boss")
                .iter()
                .all(|i| i.kind != IssueKind::MissingReference)
        );
    }

    #[test]
    fn test_mob_rules() {
        let results = validator().validate_pack(&pack(&[(
            "Mobs/m.yml",
            FolderType::Mobs,
            "NoType:\n  Health: 10\nTemplated:\n  Template: Base, Missing\nBase:\n  Type: ZOMBIE\n  Health: -5\n  Damage: -1\n  Display: '&zBad'\n  Options:\n    PreventSunburn: true\n    Flying: true\n",
        )]));

        let no_type = results.entry("Mobs/m.yml", "NoType").unwrap();
        assert!(!no_type.valid);
        assert_eq!(no_type.issues[0].kind, IssueKind::MissingRequiredField);

        let templated = results.entry("Mobs/m.yml", "Templated").unwrap();
        assert!(templated.valid);
        assert_eq!(templated.count(Severity::Warning), 1);
        assert!(results.cross_references.missing_references.mobs.contains("Missing"));

        let base = issues(&results, "Mobs/m.yml", "Base");
        assert!(base.iter().any(|i| i.field == "Health" && i.severity == Severity::Warning));
        assert!(base.iter().any(|i| i.field == "Damage"));
        assert!(base.iter().any(|i| i.kind == IssueKind::InvalidColorCode && i.severity == Severity::Info));
        assert!(base.iter().any(|i| i.kind == IssueKind::InvalidOption && i.field == "Options.Flying"));
        assert_eq!(results.summary.entries_with_errors, 1);
    }

    #[test]
    fn test_equipment_and_drops() {
        let results = validator().validate_pack(&pack(&[
            (
                "Mobs/m.yml",
                FolderType::Mobs,
                "Knight:\n  Type: ZOMBIE\n  Equipment:\n  - KingsCrown HEAD\n  - IRON_SWORD:HAND\n  Drops:\n  - droptable{dt=Loot} 1 1\n  - Gem 1 0.5\n  - DIAMOND 1 0.5\n  - Mystery 1 1\n  - exp 10\n",
            ),
            ("Items/i.yml", FolderType::Items, "Gem:\n  Id: EMERALD\n"),
            ("DropTables/d.yml", FolderType::DropTables, "Loot:\n  Drops:\n  - GOLD_INGOT 1 1\n"),
        ]));
        let knight = issues(&results, "Mobs/m.yml", "Knight");
        let missing: Vec<_> = knight
            .iter()
            .filter(|i| i.kind == IssueKind::MissingReference)
            .filter_map(|i| i.value.as_deref())
            .collect();
        assert_eq!(missing, vec!["KingsCrown", "Mystery"]);

        let refs = &results.cross_references;
        assert!(refs.resolved_references.droptables.contains("Loot"));
        assert!(refs.resolved_references.items.contains("Gem"));
        // Bare names that resolve to nothing land in the items bucket only.
        assert!(refs.missing_references.items.contains("Mystery"));
        assert!(!refs.missing_references.droptables.contains("Mystery"));
    }

    #[test]
    fn test_broken_file_hint() {
        let results = validator().validate_pack(&pack(&[
            ("Mobs/m.yml", FolderType::Mobs, "Boss:\n  Type: ZOMBIE\n  Skills:\n  - skill{s=Heal}\n"),
            ("Skills/broken.yml", FolderType::Skills, "Heal:\n  Skills: [oops\n"),
        ]));
        assert_eq!(results.files_with_errors[&FolderType::Skills], vec!["Skills/broken.yml"]);
        let boss = issues(&results, "Mobs/m.yml", "Boss");
        assert!(boss[0].suggestion.contains("Skills/broken.yml"));
        assert_eq!(results.validation_results.len(), 1);
    }

    #[test]
    fn test_skill_rules() {
        let results = validator().validate_pack(&pack(&[(
            "Skills/s.yml",
            FolderType::Skills,
            "Empty:\n  Cooldown: 5\nBad:\n  Cooldown: -1\n  Skills:\n  - damage{a=1\n  Conditions:\n  - incombat maybe\n  - health{h=<50%} castinstead Escape\nEscape:\n  Skills:\n  - teleport @self\n",
        )]));
        let empty = issues(&results, "Skills/s.yml", "Empty");
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].severity, Severity::Info);
        assert_eq!(empty[0].kind, IssueKind::MissingContent);

        let bad = issues(&results, "Skills/s.yml", "Bad");
        assert!(bad.iter().any(|i| i.field == "Cooldown"));
        assert!(bad.iter().any(|i| i.field == "Skills[0]"));
        assert!(bad.iter().any(|i| i.kind == IssueKind::InvalidCondition && i.field == "Conditions[0]"));
        assert!(bad.iter().all(|i| i.kind != IssueKind::MissingReference));
    }

    #[test]
    fn test_item_rules() {
        let results = validator().validate_pack(&pack(&[(
            "Items/i.yml",
            FolderType::Items,
            "NoId:\n  Display: Thing\nStack:\n  Id: MODDED_ORE\n  Amount: 65\n  Enchantments:\n  - DAMAGE_ALL 5\n  - SUPER_SHARP 1\n  - UNBREAKING:lots\n",
        )]));
        assert!(!results.entry("Items/i.yml", "NoId").unwrap().valid);

        let stack = results.entry("Items/i.yml", "Stack").unwrap();
        assert!(stack.valid);
        assert!(stack.issues.iter().any(|i| i.field == "Id" && i.severity == Severity::Warning));
        assert!(stack.issues.iter().any(|i| i.field == "Amount"));
        let enchantment_fields: Vec<_> = stack
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::InvalidEnchantment)
            .map(|i| i.field.as_str())
            .collect();
        assert_eq!(enchantment_fields, vec!["Enchantments[1]", "Enchantments[2]"]);
    }

    #[test]
    fn test_droptable_and_randomspawn_rules() {
        let results = validator().validate_pack(&pack(&[
            ("DropTables/d.yml", FolderType::DropTables, "Nothing:\n  TotalItems: 1\n"),
            (
                "RandomSpawns/r.yml",
                FolderType::RandomSpawns,
                "Spawn:\n  MobType: Ghost, Wraith\n  Chance: 2\n  Action: MERGE\n  Biomes:\n  - PLAINS\n  - MOON\nNoMob:\n  Chance: 0.5\n",
            ),
            ("Mobs/g.yml", FolderType::Mobs, "ghost:\n  Type: VEX\n"),
        ]));
        let table = issues(&results, "DropTables/d.yml", "Nothing");
        assert_eq!(table[0].kind, IssueKind::MissingContent);
        assert_eq!(table[0].severity, Severity::Info);

        let spawn = issues(&results, "RandomSpawns/r.yml", "Spawn");
        let missing: Vec<_> = spawn
            .iter()
            .filter(|i| i.kind == IssueKind::MissingReference)
            .filter_map(|i| i.value.as_deref())
            .collect();
        assert_eq!(missing, vec!["Wraith"]);
        assert!(spawn.iter().any(|i| i.field == "Chance"));
        assert!(spawn.iter().any(|i| i.field == "Action"));
        assert!(spawn.iter().any(|i| i.kind == IssueKind::InvalidBiome && i.value.as_deref() == Some("MOON")));
        assert!(!results.entry("RandomSpawns/r.yml", "NoMob").unwrap().valid);
    }

    #[test]
    fn test_summary_counts() {
        let results = validator().validate_pack(&pack(&[(
            "Mobs/m.yml",
            FolderType::Mobs,
            "Ok:\n  Type: ZOMBIE\nWarn:\n  Type: ZOMBIE\n  Health: 0\nCrit:\n  Health: 5\n",
        )]));
        let summary = &results.summary;
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.valid_entries, 2);
        assert_eq!(summary.entries_with_warnings, 1);
        assert_eq!(summary.entries_with_errors, 1);
        assert_eq!(summary.critical_errors, 1);
    }

    #[test]
    fn test_color_code_problem() {
        assert_eq!(color_code_problem("&aGreen &lBold"), None);
        assert_eq!(color_code_problem("&#FF00AAhex"), None);
        assert_eq!(color_code_problem("&#XYZ123"), Some("&#XYZ123".to_string()));
        assert_eq!(color_code_problem("Fish & Chips"), None);
        assert_eq!(color_code_problem("&zBad"), Some("&z".to_string()));
    }

    #[test]
    fn test_progress_reports_every_file() {
        let mut seen = Vec::new();
        validator().validate_pack_with_progress(
            &pack(&[
                ("Mobs/a.yml", FolderType::Mobs, "A:\n  Type: ZOMBIE\n"),
                ("Mobs/b.yml", FolderType::Mobs, "- broken"),
            ]),
            |done, total, file| seen.push((done, total, file.to_string())),
        );
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], (2, 2, "Mobs/b.yml".to_string()));
    }
}
