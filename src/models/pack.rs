use super::drop::DropDefinition;
use super::folder::FolderType;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use uuid::Uuid;

/// A destination pack: five typed collections of file containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packinfo: Option<PackInfo>,

    #[serde(default)]
    pub mobs: Vec<FileContainer>,
    #[serde(default)]
    pub skills: Vec<FileContainer>,
    #[serde(default)]
    pub items: Vec<FileContainer>,
    #[serde(default)]
    pub droptables: Vec<FileContainer>,
    #[serde(default)]
    pub randomspawns: Vec<FileContainer>,
}

/// Contents of `packinfo.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Pack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn collection(&self, folder: FolderType) -> &Vec<FileContainer> {
        match folder {
            FolderType::Mobs => &self.mobs,
            FolderType::Skills => &self.skills,
            FolderType::Items => &self.items,
            FolderType::DropTables => &self.droptables,
            FolderType::RandomSpawns => &self.randomspawns,
        }
    }

    pub fn collection_mut(&mut self, folder: FolderType) -> &mut Vec<FileContainer> {
        match folder {
            FolderType::Mobs => &mut self.mobs,
            FolderType::Skills => &mut self.skills,
            FolderType::Items => &mut self.items,
            FolderType::DropTables => &mut self.droptables,
            FolderType::RandomSpawns => &mut self.randomspawns,
        }
    }

    pub fn entry_count(&self) -> usize {
        FolderType::ALL
            .iter()
            .flat_map(|folder| self.collection(*folder))
            .map(|container| container.entries.len())
            .sum()
    }

    /// Whether any container of `folder` holds an entry called `name`.
    pub fn contains_entry(&self, folder: FolderType, name: &str) -> bool {
        self.collection(folder)
            .iter()
            .any(|container| container.find_entry(name).is_some())
    }

    pub fn find_container(&self, folder: FolderType, file_name: &str) -> Option<&FileContainer> {
        self.collection(folder)
            .iter()
            .find(|container| container.file_name == file_name)
    }
}

/// Destination-side grouping of entries by their originating file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContainer {
    pub id: Uuid,
    pub file_name: String,
    pub relative_path: String,
    #[serde(default)]
    pub entries: Vec<PackEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_meta: Option<ImportMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportMeta {
    pub source_file: String,
    pub imported_at: DateTime<Utc>,
}

impl FileContainer {
    pub fn new(file_name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            relative_path: relative_path.into(),
            entries: Vec::new(),
            import_meta: None,
        }
    }

    /// A container stamped with its import source.
    pub fn imported_from(file_name: &str, relative_path: &str, source_file: &str) -> Self {
        let mut container = Self::new(file_name, relative_path);
        container.import_meta = Some(ImportMeta {
            source_file: source_file.to_string(),
            imported_at: Utc::now(),
        });
        container
    }

    pub fn find_entry(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.matches_name(name))
    }
}

/// A typed definition inside a file container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PackEntry {
    Mob(MobEntry),
    Skill(SkillEntry),
    Item(ItemEntry),
    DropTable(DropTableEntry),
    RandomSpawn(RandomSpawnEntry),
}

impl PackEntry {
    pub fn folder_type(&self) -> FolderType {
        match self {
            PackEntry::Mob(_) => FolderType::Mobs,
            PackEntry::Skill(_) => FolderType::Skills,
            PackEntry::Item(_) => FolderType::Items,
            PackEntry::DropTable(_) => FolderType::DropTables,
            PackEntry::RandomSpawn(_) => FolderType::RandomSpawns,
        }
    }

    fn names(&self) -> (&str, &str) {
        match self {
            PackEntry::Mob(e) => (&e.name, &e.internal_name),
            PackEntry::Skill(e) => (&e.name, &e.internal_name),
            PackEntry::Item(e) => (&e.name, &e.internal_name),
            PackEntry::DropTable(e) => (&e.name, &e.internal_name),
            PackEntry::RandomSpawn(e) => (&e.name, &e.internal_name),
        }
    }

    pub fn name(&self) -> &str {
        self.names().0
    }

    pub fn internal_name(&self) -> &str {
        self.names().1
    }

    /// Case-insensitive match against either name.
    pub fn matches_name(&self, name: &str) -> bool {
        let (display, internal) = self.names();
        display.eq_ignore_ascii_case(name) || internal.eq_ignore_ascii_case(name)
    }

    /// Append `suffix` to both `name` and `internal_name`.
    pub fn append_suffix(&mut self, suffix: &str) {
        let (name, internal) = match self {
            PackEntry::Mob(e) => (&mut e.name, &mut e.internal_name),
            PackEntry::Skill(e) => (&mut e.name, &mut e.internal_name),
            PackEntry::Item(e) => (&mut e.name, &mut e.internal_name),
            PackEntry::DropTable(e) => (&mut e.name, &mut e.internal_name),
            PackEntry::RandomSpawn(e) => (&mut e.name, &mut e.internal_name),
        };
        name.push_str(suffix);
        internal.push_str(suffix);
    }

    pub fn is_placeholder(&self) -> bool {
        match self {
            PackEntry::Skill(e) => e.placeholder,
            PackEntry::Item(e) => e.placeholder,
            PackEntry::DropTable(e) => e.placeholder,
            PackEntry::Mob(_) | PackEntry::RandomSpawn(_) => false,
        }
    }

    /// Minimal stub for an entity that is referenced but never defined.
    /// Only skills, items and drop tables get placeholders.
    pub fn placeholder(folder: FolderType, name: &str) -> Option<Self> {
        match folder {
            FolderType::Skills => Some(PackEntry::Skill(SkillEntry {
                placeholder: true,
                ..SkillEntry::named(name)
            })),
            FolderType::Items => Some(PackEntry::Item(ItemEntry {
                id: Some("STONE".to_string()),
                placeholder: true,
                ..ItemEntry::named(name)
            })),
            FolderType::DropTables => Some(PackEntry::DropTable(DropTableEntry {
                placeholder: true,
                ..DropTableEntry::named(name)
            })),
            FolderType::Mobs | FolderType::RandomSpawns => None,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MobEntry {
    pub name: String,
    pub internal_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mob_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_range: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knockback_resistance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collidable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_base_plate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_gravity: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropDefinition>,
    /// slot -> item
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub equipment: IndexMap<String, String>,
    /// damage cause -> multiplier
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub damage_modifiers: IndexMap<String, f64>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, Value>,

    /// Fields the importer does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub internal_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger_conditions: Vec<String>,

    #[serde(rename = "_placeholder", default, skip_serializing_if = "is_false")]
    pub placeholder: bool,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub name: String,
    pub internal_name: String,

    /// Material id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
    /// Normalized to `NAME LEVEL`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enchantments: Vec<String>,

    #[serde(rename = "_placeholder", default, skip_serializing_if = "is_false")]
    pub placeholder: bool,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropTableEntry {
    pub name: String,
    pub internal_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<String>,

    #[serde(rename = "_placeholder", default, skip_serializing_if = "is_false")]
    pub placeholder: bool,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomSpawnEntry {
    pub name: String,
    pub internal_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mob_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub worlds: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub biomes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// One of ADD, REPLACE, DENY, SCALE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Keys every serialized entry writes besides its own typed fields.
pub const ENTRY_KEYS: &[&str] = &["kind", "name", "internal_name", "_placeholder"];

impl MobEntry {
    /// Keys written by the typed fields.
    pub const FIELD_KEYS: &[&str] = &[
        "mob_type",
        "template",
        "display",
        "faction",
        "health",
        "damage",
        "armor",
        "movement_speed",
        "follow_range",
        "knockback_resistance",
        "collidable",
        "has_base_plate",
        "has_gravity",
        "skills",
        "drops",
        "equipment",
        "damage_modifiers",
        "options",
    ];
}

impl SkillEntry {
    pub const FIELD_KEYS: &[&str] = &[
        "cooldown",
        "skills",
        "conditions",
        "target_conditions",
        "trigger_conditions",
    ];
}

impl ItemEntry {
    pub const FIELD_KEYS: &[&str] = &["id", "display", "amount", "lore", "enchantments"];
}

impl DropTableEntry {
    pub const FIELD_KEYS: &[&str] = &["drops", "conditions", "total_items", "min_items", "max_items"];
}

impl RandomSpawnEntry {
    pub const FIELD_KEYS: &[&str] = &[
        "mob_types",
        "worlds",
        "biomes",
        "chance",
        "priority",
        "action",
        "conditions",
    ];
}

macro_rules! named_ctor {
    ($($ty:ty),+) => {
        $(impl $ty {
            pub fn named(name: &str) -> Self {
                Self {
                    name: name.to_string(),
                    internal_name: name.to_string(),
                    ..Self::default()
                }
            }
        })+
    };
}

named_ctor!(MobEntry, SkillEntry, ItemEntry, DropTableEntry, RandomSpawnEntry);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_matching_and_suffix() {
        let mut entry = PackEntry::Skill(SkillEntry::named("Fireball"));
        assert!(entry.matches_name("FIREBALL"));
        entry.append_suffix("_imported");
        assert_eq!(entry.name(), "Fireball_imported");
        assert_eq!(entry.internal_name(), "Fireball_imported");
        assert!(!entry.matches_name("Fireball"));
    }

    #[test]
    fn test_placeholder_only_for_referenced_kinds() {
        let stub = PackEntry::placeholder(FolderType::Skills, "Heal").unwrap();
        assert!(stub.is_placeholder());
        assert_eq!(stub.name(), "Heal");
        assert!(PackEntry::placeholder(FolderType::Mobs, "Boss").is_none());
    }

    #[test]
    fn test_pack_yaml_round_trip_keeps_placeholder_flag() {
        let mut pack = Pack::new("Test");
        let mut container = FileContainer::new("_placeholders.yml", "Skills/_placeholders.yml");
        container
            .entries
            .push(PackEntry::placeholder(FolderType::Skills, "Heal").unwrap());
        pack.skills.push(container);

        let yaml = serde_yaml_ng::to_string(&pack).unwrap();
        assert!(yaml.contains("_placeholder: true"));
        assert!(yaml.contains("kind: skill"));

        let loaded: Pack = serde_yaml_ng::from_str(&yaml).unwrap();
        assert!(loaded.skills[0].entries[0].is_placeholder());
        assert!(loaded.contains_entry(FolderType::Skills, "heal"));
    }

    #[test]
    fn test_template_mob_serializes_without_unset_fields() {
        let mob = PackEntry::Mob(MobEntry {
            template: Some("Boss".to_string()),
            ..MobEntry::named("Minion")
        });
        let yaml = serde_yaml_ng::to_string(&mob).unwrap();
        assert!(!yaml.contains("health"));
        assert!(yaml.contains("template: Boss"));
    }
}
