//! Conversion of parsed YAML entries into typed [`PackEntry`] values.

use crate::models::record::{scalar_to_string, value_to_f64, value_to_lines};
use crate::models::pack::ENTRY_KEYS;
use crate::models::{
    CiRecord, DropDefinition, DropTableEntry, FolderType, GameTables, ItemEntry, MobEntry,
    PackEntry, ParsedEntry, RandomSpawnEntry, SkillEntry,
};
use crate::services::references::{parse_enchantment, parse_equipment};
use indexmap::IndexMap;
use serde_yaml_ng::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Entry \"{0}\" is not a mapping of fields")]
    NotAMapping(String),

    #[error("Entry has an empty name")]
    EmptyName,
}

/// Hard defaults for mobs that do not inherit from a template.
pub const DEFAULT_HEALTH: f64 = 20.0;
pub const DEFAULT_DAMAGE: f64 = 0.0;
pub const DEFAULT_ARMOR: f64 = 0.0;
pub const DEFAULT_MOVEMENT_SPEED: f64 = 0.2;
pub const DEFAULT_FOLLOW_RANGE: f64 = 32.0;

const MOB_FIELDS: &[&str] = &[
    "mobtype",
    "type",
    "template",
    "display",
    "faction",
    "health",
    "damage",
    "armor",
    "skills",
    "drops",
    "equipment",
    "damagemodifiers",
    "options",
];
const SKILL_FIELDS: &[&str] = &[
    "cooldown",
    "skills",
    "conditions",
    "targetconditions",
    "triggerconditions",
];
const ITEM_FIELDS: &[&str] = &["id", "display", "amount", "lore", "enchantments"];
const DROPTABLE_FIELDS: &[&str] = &["drops", "conditions", "totalitems", "minitems", "maxitems"];
const RANDOMSPAWN_FIELDS: &[&str] = &[
    "mobtype",
    "type",
    "worlds",
    "world",
    "biomes",
    "biome",
    "chance",
    "priority",
    "action",
    "conditions",
];

/// Mob options lifted into typed fields.
const LIFTED_OPTIONS: &[&str] = &[
    "movementspeed",
    "followrange",
    "knockbackresistance",
    "collidable",
    "hasbaseplate",
    "hasgravity",
];

pub struct EntryConverter {
    tables: Arc<GameTables>,
}

impl EntryConverter {
    pub fn new(tables: Arc<GameTables>) -> Self {
        Self { tables }
    }

    pub fn convert(
        &self,
        folder_type: FolderType,
        entry: &ParsedEntry,
    ) -> Result<PackEntry, ConversionError> {
        if entry.name.trim().is_empty() {
            return Err(ConversionError::EmptyName);
        }
        let record = CiRecord::from_value(&entry.data)
            .ok_or_else(|| ConversionError::NotAMapping(entry.name.clone()))?;

        let converted = match folder_type {
            FolderType::Mobs => PackEntry::Mob(self.convert_mob(&entry.name, &record)),
            FolderType::Skills => PackEntry::Skill(convert_skill(&entry.name, &record)),
            FolderType::Items => PackEntry::Item(self.convert_item(&entry.name, &record)),
            FolderType::DropTables => {
                PackEntry::DropTable(convert_droptable(&entry.name, &record))
            }
            FolderType::RandomSpawns => {
                PackEntry::RandomSpawn(convert_randomspawn(&entry.name, &record))
            }
        };
        Ok(converted)
    }

    fn convert_mob(&self, name: &str, record: &CiRecord) -> MobEntry {
        let template = record
            .get_string("Template")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let mut options: IndexMap<String, Value> = match record.get("Options") {
            Some(Value::Mapping(mapping)) => mapping
                .iter()
                .filter_map(|(key, value)| Some((scalar_to_string(key)?, value.clone())))
                .collect(),
            _ => IndexMap::new(),
        };
        let options_record = match record.get("Options") {
            Some(value) => CiRecord::from_value(value).unwrap_or_default(),
            None => CiRecord::default(),
        };
        options.retain(|key, _| !LIFTED_OPTIONS.contains(&key.to_ascii_lowercase().as_str()));

        let mut extra = record.unknown_fields(MOB_FIELDS);
        if let Some(value) = record.get("Options").filter(|v| !v.is_mapping() && !v.is_null()) {
            extra.insert(
                record.original_key("Options").unwrap_or("Options").to_string(),
                value.clone(),
            );
        }

        let mut mob = MobEntry {
            mob_type: record
                .get_any(&["MobType", "Type"])
                .and_then(scalar_to_string)
                .map(|t| t.trim().to_string()),
            display: record.get_string("Display"),
            faction: record.get_string("Faction"),
            health: record.get_f64("Health"),
            damage: record.get_f64("Damage"),
            armor: record.get_f64("Armor"),
            movement_speed: options_record.get_f64("MovementSpeed"),
            follow_range: options_record.get_f64("FollowRange"),
            knockback_resistance: options_record.get_f64("KnockbackResistance"),
            collidable: options_record.get_bool("Collidable"),
            has_base_plate: options_record.get_bool("HasBasePlate"),
            has_gravity: options_record.get_bool("HasGravity"),
            skills: record.get_lines("Skills"),
            drops: convert_drops(record),
            equipment: record
                .get("Equipment")
                .map(parse_equipment)
                .unwrap_or_default()
                .into_iter()
                .filter(|(slot, _)| !slot.is_empty())
                .collect(),
            damage_modifiers: record
                .get("DamageModifiers")
                .map(parse_damage_modifiers)
                .unwrap_or_default(),
            options,
            extra: preserve_extra(extra, MobEntry::FIELD_KEYS),
            template: template.clone(),
            ..MobEntry::named(name)
        };

        // Templated mobs inherit unset values at runtime.
        if template.is_none() {
            mob.health.get_or_insert(DEFAULT_HEALTH);
            mob.damage.get_or_insert(DEFAULT_DAMAGE);
            mob.armor.get_or_insert(DEFAULT_ARMOR);
            mob.movement_speed.get_or_insert(DEFAULT_MOVEMENT_SPEED);
            mob.follow_range.get_or_insert(DEFAULT_FOLLOW_RANGE);
            mob.collidable.get_or_insert(true);
            mob.has_base_plate.get_or_insert(true);
            mob.has_gravity.get_or_insert(true);
        }

        if self.tables.is_entity_type(mob.mob_type.as_deref().unwrap_or("")) {
            mob.mob_type = mob.mob_type.map(|t| t.to_ascii_uppercase());
        }
        mob
    }

    fn convert_item(&self, name: &str, record: &CiRecord) -> ItemEntry {
        let mut extra = record.unknown_fields(ITEM_FIELDS);

        let amount = record.get("Amount").and_then(|value| {
            let parsed = value_to_f64(value)
                .filter(|a| *a >= 0.0 && a.fract() == 0.0 && *a <= f64::from(u32::MAX))
                .map(|a| a as u32);
            if parsed.is_none() {
                extra.insert(
                    record.original_key("Amount").unwrap_or("Amount").to_string(),
                    value.clone(),
                );
            }
            parsed
        });

        let enchantments = match record.get("Enchantments") {
            Some(Value::Sequence(values)) => values
                .iter()
                .filter_map(|value| self.normalize_enchantment(value))
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => self.normalize_enchantment(other).into_iter().collect(),
        };

        ItemEntry {
            id: record.get_string("Id").map(|id| id.trim().to_string()),
            display: record.get_string("Display"),
            amount,
            lore: record.get_lines("Lore"),
            enchantments,
            extra: preserve_extra(extra, ItemEntry::FIELD_KEYS),
            ..ItemEntry::named(name)
        }
    }

    /// `NAME LEVEL` with legacy names mapped to their current spelling.
    fn normalize_enchantment(&self, value: &Value) -> Option<String> {
        let (name, level) = parse_enchantment(value)?;
        let name = self.tables.normalize_enchantment(&name);
        Some(match level.filter(|l| !l.is_empty()) {
            Some(level) => format!("{} {}", name, level),
            None => name,
        })
    }
}

fn convert_skill(name: &str, record: &CiRecord) -> SkillEntry {
    SkillEntry {
        cooldown: record.get_f64("Cooldown"),
        skills: record.get_lines("Skills"),
        conditions: record.get_lines("Conditions"),
        target_conditions: record.get_lines("TargetConditions"),
        trigger_conditions: record.get_lines("TriggerConditions"),
        extra: preserve_extra(record.unknown_fields(SKILL_FIELDS), SkillEntry::FIELD_KEYS),
        ..SkillEntry::named(name)
    }
}

fn convert_droptable(name: &str, record: &CiRecord) -> DropTableEntry {
    DropTableEntry {
        drops: convert_drops(record),
        conditions: record.get_lines("Conditions"),
        total_items: record.get_string("TotalItems"),
        min_items: record.get_string("MinItems"),
        max_items: record.get_string("MaxItems"),
        extra: preserve_extra(
            record.unknown_fields(DROPTABLE_FIELDS),
            DropTableEntry::FIELD_KEYS,
        ),
        ..DropTableEntry::named(name)
    }
}

fn convert_randomspawn(name: &str, record: &CiRecord) -> RandomSpawnEntry {
    let list = |keys: &[&str]| -> Vec<String> {
        record
            .get_any(keys)
            .map(value_to_lines)
            .unwrap_or_default()
            .iter()
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    RandomSpawnEntry {
        mob_types: list(&["MobType", "Type"]),
        worlds: list(&["Worlds", "World"]),
        biomes: list(&["Biomes", "Biome"]),
        chance: record.get_f64("Chance"),
        priority: record
            .get_f64("Priority")
            .filter(|p| p.fract() == 0.0)
            .map(|p| p as i64),
        action: record
            .get_string("Action")
            .map(|a| a.trim().to_ascii_uppercase()),
        conditions: record.get_lines("Conditions"),
        extra: preserve_extra(
            record.unknown_fields(RANDOMSPAWN_FIELDS),
            RandomSpawnEntry::FIELD_KEYS,
        ),
        ..RandomSpawnEntry::named(name)
    }
}

/// Keep unmodelled fields, renaming any whose key the typed entry already
/// writes (`kind` is stored as `source_kind`).
fn preserve_extra(extra: IndexMap<String, Value>, field_keys: &[&str]) -> IndexMap<String, Value> {
    let reserved = |key: &str| ENTRY_KEYS.contains(&key) || field_keys.contains(&key);
    let taken: Vec<String> = extra.keys().cloned().collect();

    let mut kept = IndexMap::with_capacity(extra.len());
    for (key, value) in extra {
        if !reserved(&key) {
            kept.insert(key, value);
            continue;
        }
        let mut renamed = format!("source_{}", key);
        while reserved(&renamed) || taken.contains(&renamed) || kept.contains_key(&renamed) {
            renamed = format!("source_{}", renamed);
        }
        tracing::debug!("Storing field \"{}\" as \"{}\"", key, renamed);
        kept.insert(renamed, value);
    }
    kept
}

fn convert_drops(record: &CiRecord) -> Vec<DropDefinition> {
    record
        .get_lines("Drops")
        .iter()
        .filter_map(|line| DropDefinition::parse(line))
        .collect()
}

/// `["FALL 0", "FIRE 0.5"]` or `{FALL: 0, FIRE: 0.5}` into a cause -> multiplier
/// map. Non-numeric values are dropped.
pub fn parse_damage_modifiers(value: &Value) -> IndexMap<String, f64> {
    match value {
        Value::Mapping(mapping) => mapping
            .iter()
            .filter_map(|(cause, multiplier)| {
                Some((scalar_to_string(cause)?.trim().to_string(), value_to_f64(multiplier)?))
            })
            .collect(),
        other => value_to_lines(other)
            .iter()
            .filter_map(|line| {
                let line = line.trim().trim_start_matches("- ");
                let (cause, multiplier) = line
                    .split_once(char::is_whitespace)
                    .or_else(|| line.split_once(':'))?;
                let multiplier = multiplier.trim().parse::<f64>().ok()?;
                Some((cause.trim().to_string(), multiplier))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DropKind, GameData};

    fn converter() -> EntryConverter {
        EntryConverter::new(Arc::new(GameData::default().tables()))
    }

    fn entry(name: &str, yaml: &str) -> ParsedEntry {
        ParsedEntry {
            name: name.to_string(),
            data: serde_yaml_ng::from_str(yaml).unwrap(),
        }
    }

    fn mob(yaml: &str) -> MobEntry {
        match converter().convert(FolderType::Mobs, &entry("Mob", yaml)).unwrap() {
            PackEntry::Mob(mob) => mob,
            other => panic!("expected a mob, got {:?}", other),
        }
    }

    #[test]
    fn test_untemplated_mob_gets_defaults() {
        let mob = mob("MobType: zombie\nDisplay: '&cGrunt'\n");
        assert_eq!(mob.health, Some(20.0));
        assert_eq!(mob.damage, Some(0.0));
        assert_eq!(mob.armor, Some(0.0));
        assert_eq!(mob.movement_speed, Some(0.2));
        assert_eq!(mob.follow_range, Some(32.0));
        assert_eq!(mob.collidable, Some(true));
        assert_eq!(mob.has_base_plate, Some(true));
        assert_eq!(mob.has_gravity, Some(true));
        assert_eq!(mob.mob_type.as_deref(), Some("ZOMBIE"));
    }

    #[test]
    fn test_templated_mob_leaves_fields_unset() {
        let mob = mob("Template: Boss\nDamage: 4\n");
        assert_eq!(mob.health, None);
        assert_eq!(mob.damage, Some(4.0));
        assert_eq!(mob.movement_speed, None);
        assert_eq!(mob.has_gravity, None);

        let yaml = serde_yaml_ng::to_string(&PackEntry::Mob(mob)).unwrap();
        assert!(!yaml.contains("health"));
        assert!(!yaml.contains("null"));
    }

    #[test]
    fn test_mob_options_and_lists() {
        let mob = mob(
            "type: SKELETON\noptions:\n  MovementSpeed: 0.35\n  PreventSunburn: true\nskills:\n- fireball @target ~onTimer:40\nDrops:\n- DIAMOND 1 0.5\nEquipment:\n- IRON_HELMET HEAD\nBossBar:\n  Enabled: true\n",
        );
        assert_eq!(mob.movement_speed, Some(0.35));
        assert!(mob.options.contains_key("PreventSunburn"));
        assert!(!mob.options.contains_key("MovementSpeed"));
        assert_eq!(mob.skills.len(), 1);
        assert_eq!(mob.drops[0].kind, DropKind::Item);
        assert_eq!(mob.equipment.get("HEAD").map(String::as_str), Some("IRON_HELMET"));
        assert!(mob.extra.contains_key("BossBar"));
    }

    #[test]
    fn test_damage_modifiers_both_forms() {
        let list: Value = serde_yaml_ng::from_str("- FALL 0\n- FIRE 0.5\n- MAGIC lots\n").unwrap();
        let parsed = parse_damage_modifiers(&list);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["FIRE"], 0.5);

        let map: Value = serde_yaml_ng::from_str("FALL: 0\nDROWNING: nope\n").unwrap();
        let parsed = parse_damage_modifiers(&map);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["FALL"], 0.0);
    }

    #[test]
    fn test_item_enchantments_are_normalized() {
        let converted = converter()
            .convert(
                FolderType::Items,
                &entry(
                    "Blade",
                    "Id: DIAMOND_SWORD\nAmount: 1\nEnchantments:\n- DAMAGE_ALL:5\n- UNBREAKING 3\n- {type: MENDING}\n",
                ),
            )
            .unwrap();
        let PackEntry::Item(item) = converted else {
            panic!("expected an item");
        };
        assert_eq!(item.amount, Some(1));
        assert_eq!(item.enchantments, vec!["SHARPNESS 5", "UNBREAKING 3", "MENDING"]);
    }

    #[test]
    fn test_non_mapping_entry_fails() {
        let err = converter()
            .convert(FolderType::Skills, &entry("Broken", "just a string"))
            .unwrap_err();
        assert_eq!(err, ConversionError::NotAMapping("Broken".to_string()));
    }

    #[test]
    fn test_randomspawn_lists() {
        let converted = converter()
            .convert(
                FolderType::RandomSpawns,
                &entry(
                    "Night",
                    "MobType: Ghost, Wraith\nWorld: world\nBiomes:\n- PLAINS\nChance: 0.2\nPriority: 3\nAction: add\n",
                ),
            )
            .unwrap();
        let PackEntry::RandomSpawn(spawn) = converted else {
            panic!("expected a random spawn");
        };
        assert_eq!(spawn.mob_types, vec!["Ghost", "Wraith"]);
        assert_eq!(spawn.worlds, vec!["world"]);
        assert_eq!(spawn.priority, Some(3));
        assert_eq!(spawn.action.as_deref(), Some("ADD"));
    }

    #[test]
    fn test_reserved_source_keys_survive_yaml_round_trip() {
        let converted = converter()
            .convert(
                FolderType::Skills,
                &entry("Zap", "kind: aura
Cooldown: 5
name: other
source_kind: x
"),
            )
            .unwrap();
        let PackEntry::Skill(skill) = &converted else {
            panic!("expected a skill");
        };
        assert_eq!(skill.name, "Zap");
        assert_eq!(skill.extra.get("source_kind"), Some(&Value::from("x")));
        assert_eq!(skill.extra.get("source_source_kind"), Some(&Value::from("aura")));
        assert_eq!(skill.extra.get("source_name"), Some(&Value::from("other")));
        assert!(!skill.extra.contains_key("kind"));

        let yaml = serde_yaml_ng::to_string(&converted).unwrap();
        let loaded: PackEntry = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(loaded, converted);
    }

    #[test]
    fn test_snake_case_source_key_does_not_shadow_typed_field() {
        let mob = mob("Type: ZOMBIE
damage_modifiers: lots
_placeholder: true
");
        assert!(mob.damage_modifiers.is_empty());
        assert_eq!(mob.extra.get("source_damage_modifiers"), Some(&Value::from("lots")));
        assert_eq!(mob.extra.get("source__placeholder"), Some(&Value::from(true)));

        let entry = PackEntry::Mob(mob);
        let yaml = serde_yaml_ng::to_string(&entry).unwrap();
        let loaded: PackEntry = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(loaded, entry);
    }
}
