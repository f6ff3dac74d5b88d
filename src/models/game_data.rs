//! Lookup tables the validator and converter consult.
//!
//! [`GameData`] is the serializable form stored in `MythicPack Data.yaml`;
//! [`GameTables`] is the folded, hash-indexed form built once per run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub version: String,

    #[serde(rename = "Materials", default)]
    pub materials: Vec<String>,

    #[serde(rename = "Entity_Types", default)]
    pub entity_types: Vec<String>,

    #[serde(rename = "Biomes", default)]
    pub biomes: Vec<String>,

    #[serde(rename = "Enchantments", default)]
    pub enchantments: Vec<String>,

    /// Legacy Bukkit enchantment name -> current name.
    #[serde(rename = "Enchantment_Aliases", default)]
    pub enchantment_aliases: IndexMap<String, String>,

    #[serde(rename = "Equipment_Slots", default)]
    pub equipment_slots: Vec<String>,

    #[serde(rename = "Mob_Options", default)]
    pub mob_options: Vec<String>,

    #[serde(rename = "Mechanics", default)]
    pub mechanics: Vec<String>,

    /// Words allowed after a condition (`true`, `power 2`, `cast Heal`, ...).
    #[serde(rename = "Condition_Actions", default)]
    pub condition_actions: Vec<String>,
}

const MATERIALS: &[&str] = &[
    "STONE", "GRANITE", "DIORITE", "ANDESITE", "DEEPSLATE", "COBBLESTONE", "DIRT", "GRASS_BLOCK",
    "SAND", "GRAVEL", "CLAY_BALL", "OBSIDIAN", "CRYING_OBSIDIAN", "NETHERRACK", "END_STONE",
    "GLASS", "OAK_LOG", "SPRUCE_LOG", "BIRCH_LOG", "OAK_PLANKS", "BEDROCK", "TNT", "BOOKSHELF",
    "CHEST", "BARRIER", "SPAWNER", "BEACON", "GLOWSTONE", "SEA_LANTERN", "SPONGE", "ICE",
    "PACKED_ICE", "BLUE_ICE", "SNOW_BLOCK", "SNOWBALL", "PUMPKIN", "CARVED_PUMPKIN",
    "JACK_O_LANTERN", "MELON", "CACTUS", "VINE", "LILY_PAD", "COBWEB", "TORCH", "SOUL_TORCH",
    "LANTERN", "SOUL_LANTERN", "CAMPFIRE", "ANVIL", "ENCHANTING_TABLE", "CRAFTING_TABLE",
    "FURNACE", "HOPPER", "DISPENSER", "DROPPER", "LEVER", "REDSTONE", "REDSTONE_BLOCK",
    "REDSTONE_TORCH", "COAL", "CHARCOAL", "COAL_BLOCK", "IRON_INGOT", "IRON_NUGGET",
    "IRON_BLOCK", "RAW_IRON", "GOLD_INGOT", "GOLD_NUGGET", "GOLD_BLOCK", "RAW_GOLD",
    "COPPER_INGOT", "RAW_COPPER", "DIAMOND", "DIAMOND_BLOCK", "EMERALD", "EMERALD_BLOCK",
    "LAPIS_LAZULI", "LAPIS_BLOCK", "QUARTZ", "AMETHYST_SHARD", "NETHERITE_INGOT",
    "NETHERITE_SCRAP", "NETHERITE_BLOCK", "NETHER_STAR", "ECHO_SHARD", "STICK", "STRING",
    "FEATHER", "FLINT", "LEATHER", "RABBIT_HIDE", "BONE", "BONE_MEAL", "GUNPOWDER",
    "BLAZE_ROD", "BLAZE_POWDER", "BREEZE_ROD", "GHAST_TEAR", "ENDER_PEARL", "ENDER_EYE",
    "SLIME_BALL", "MAGMA_CREAM", "SPIDER_EYE", "FERMENTED_SPIDER_EYE", "ROTTEN_FLESH",
    "PHANTOM_MEMBRANE", "SHULKER_SHELL", "PRISMARINE_SHARD", "PRISMARINE_CRYSTALS",
    "NAUTILUS_SHELL", "HEART_OF_THE_SEA", "TURTLE_SCUTE", "ARMADILLO_SCUTE", "INK_SAC",
    "GLOW_INK_SAC", "GLOWSTONE_DUST", "PAPER", "BOOK", "WRITABLE_BOOK", "WRITTEN_BOOK",
    "ENCHANTED_BOOK", "NAME_TAG", "LEAD", "SADDLE", "MAP", "FILLED_MAP", "COMPASS", "CLOCK",
    "SPYGLASS", "BUCKET", "WATER_BUCKET", "LAVA_BUCKET", "MILK_BUCKET", "EXPERIENCE_BOTTLE",
    "GLASS_BOTTLE", "POTION", "SPLASH_POTION", "LINGERING_POTION", "TIPPED_ARROW", "ARROW",
    "SPECTRAL_ARROW", "FIREWORK_ROCKET", "FIREWORK_STAR", "FIRE_CHARGE", "TOTEM_OF_UNDYING",
    "ELYTRA", "SHIELD", "TRIDENT", "MACE", "BOW", "CROSSBOW", "FISHING_ROD",
    "CARROT_ON_A_STICK", "FLINT_AND_STEEL", "SHEARS", "APPLE", "GOLDEN_APPLE",
    "ENCHANTED_GOLDEN_APPLE", "BREAD", "COOKIE", "CAKE", "PUMPKIN_PIE", "CARROT",
    "GOLDEN_CARROT", "POTATO", "BAKED_POTATO", "POISONOUS_POTATO", "BEETROOT", "WHEAT",
    "WHEAT_SEEDS", "SUGAR", "SUGAR_CANE", "EGG", "HONEY_BOTTLE", "HONEYCOMB", "BEEF",
    "COOKED_BEEF", "PORKCHOP", "COOKED_PORKCHOP", "CHICKEN", "COOKED_CHICKEN", "MUTTON",
    "COOKED_MUTTON", "RABBIT", "COOKED_RABBIT", "COD", "COOKED_COD", "SALMON",
    "COOKED_SALMON", "TROPICAL_FISH", "PUFFERFISH", "MUSHROOM_STEW", "RABBIT_STEW",
    "BEETROOT_SOUP", "SUSPICIOUS_STEW", "CHORUS_FRUIT", "SWEET_BERRIES", "GLOW_BERRIES",
    "DRIED_KELP", "MELON_SLICE", "NETHER_WART", "WOODEN_SWORD", "STONE_SWORD", "IRON_SWORD",
    "GOLDEN_SWORD", "DIAMOND_SWORD", "NETHERITE_SWORD", "WOODEN_AXE", "STONE_AXE",
    "IRON_AXE", "GOLDEN_AXE", "DIAMOND_AXE", "NETHERITE_AXE", "WOODEN_PICKAXE",
    "STONE_PICKAXE", "IRON_PICKAXE", "GOLDEN_PICKAXE", "DIAMOND_PICKAXE",
    "NETHERITE_PICKAXE", "WOODEN_SHOVEL", "STONE_SHOVEL", "IRON_SHOVEL", "GOLDEN_SHOVEL",
    "DIAMOND_SHOVEL", "NETHERITE_SHOVEL", "WOODEN_HOE", "STONE_HOE", "IRON_HOE",
    "GOLDEN_HOE", "DIAMOND_HOE", "NETHERITE_HOE", "LEATHER_HELMET", "LEATHER_CHESTPLATE",
    "LEATHER_LEGGINGS", "LEATHER_BOOTS", "CHAINMAIL_HELMET", "CHAINMAIL_CHESTPLATE",
    "CHAINMAIL_LEGGINGS", "CHAINMAIL_BOOTS", "IRON_HELMET", "IRON_CHESTPLATE",
    "IRON_LEGGINGS", "IRON_BOOTS", "GOLDEN_HELMET", "GOLDEN_CHESTPLATE", "GOLDEN_LEGGINGS",
    "GOLDEN_BOOTS", "DIAMOND_HELMET", "DIAMOND_CHESTPLATE", "DIAMOND_LEGGINGS",
    "DIAMOND_BOOTS", "NETHERITE_HELMET", "NETHERITE_CHESTPLATE", "NETHERITE_LEGGINGS",
    "NETHERITE_BOOTS", "TURTLE_HELMET", "LEATHER_HORSE_ARMOR", "IRON_HORSE_ARMOR",
    "GOLDEN_HORSE_ARMOR", "DIAMOND_HORSE_ARMOR", "WOLF_ARMOR", "PLAYER_HEAD",
    "ZOMBIE_HEAD", "SKELETON_SKULL", "WITHER_SKELETON_SKULL", "CREEPER_HEAD",
    "DRAGON_HEAD", "PIGLIN_HEAD", "DRAGON_EGG", "DRAGON_BREATH", "WHITE_WOOL", "RED_WOOL",
    "BLACK_WOOL", "WHITE_BANNER", "RED_BANNER", "BLACK_BANNER", "CARVED_PUMPKIN",
    "MUSIC_DISC_13", "MUSIC_DISC_CAT", "GOAT_HORN", "BRUSH", "TRIAL_KEY", "OMINOUS_TRIAL_KEY",
    "HEAVY_CORE", "WIND_CHARGE", "ARMOR_STAND", "ITEM_FRAME", "PAINTING", "MINECART",
    "OAK_BOAT", "EMERALD_ORE", "DIAMOND_ORE", "GOLD_ORE", "IRON_ORE", "COAL_ORE",
    "ANCIENT_DEBRIS", "SCULK", "SCULK_CATALYST", "SCULK_SHRIEKER", "SCULK_SENSOR",
];

const ENTITY_TYPES: &[&str] = &[
    "ALLAY", "ARMADILLO", "ARMOR_STAND", "AXOLOTL", "BAT", "BEE", "BLAZE", "BOGGED", "BREEZE",
    "CAMEL", "CAT", "CAVE_SPIDER", "CHICKEN", "COD", "COW", "CREEPER", "DOLPHIN", "DONKEY",
    "DROWNED", "ELDER_GUARDIAN", "ENDER_DRAGON", "ENDERMAN", "ENDERMITE", "EVOKER", "FOX",
    "FROG", "GHAST", "GIANT", "GLOW_SQUID", "GOAT", "GUARDIAN", "HOGLIN", "HORSE", "HUSK",
    "ILLUSIONER", "IRON_GOLEM", "LLAMA", "MAGMA_CUBE", "MOOSHROOM", "MUSHROOM_COW", "MULE",
    "OCELOT", "PANDA", "PARROT", "PHANTOM", "PIG", "PIGLIN", "PIGLIN_BRUTE", "PIG_ZOMBIE",
    "PILLAGER", "POLAR_BEAR", "PUFFERFISH", "RABBIT", "RAVAGER", "SALMON", "SHEEP",
    "SHULKER", "SILVERFISH", "SKELETON", "SKELETON_HORSE", "SLIME", "SNIFFER", "SNOW_GOLEM",
    "SNOWMAN", "SPIDER", "SQUID", "STRAY", "STRIDER", "TADPOLE", "TRADER_LLAMA",
    "TROPICAL_FISH", "TURTLE", "VEX", "VILLAGER", "VINDICATOR", "WANDERING_TRADER", "WARDEN",
    "WITCH", "WITHER", "WITHER_SKELETON", "WOLF", "ZOGLIN", "ZOMBIE", "ZOMBIE_HORSE",
    "ZOMBIE_VILLAGER", "ZOMBIFIED_PIGLIN", "BABY_ZOMBIE", "BABY_DROWNED", "BABY_HUSK",
    "BABY_PIG_ZOMBIE", "BABY_ZOMBIE_VILLAGER", "BLOCK_DISPLAY", "ITEM_DISPLAY",
    "TEXT_DISPLAY", "INTERACTION", "FALLING_BLOCK", "DROPPED_ITEM", "PRIMED_TNT",
    "MINECART", "BOAT", "ENDER_CRYSTAL", "END_CRYSTAL",
];

const BIOMES: &[&str] = &[
    "BADLANDS", "BAMBOO_JUNGLE", "BASALT_DELTAS", "BEACH", "BIRCH_FOREST", "CHERRY_GROVE",
    "COLD_OCEAN", "CRIMSON_FOREST", "DARK_FOREST", "DEEP_COLD_OCEAN", "DEEP_DARK",
    "DEEP_FROZEN_OCEAN", "DEEP_LUKEWARM_OCEAN", "DEEP_OCEAN", "DESERT", "DRIPSTONE_CAVES",
    "END_BARRENS", "END_HIGHLANDS", "END_MIDLANDS", "ERODED_BADLANDS", "FLOWER_FOREST",
    "FOREST", "FROZEN_OCEAN", "FROZEN_PEAKS", "FROZEN_RIVER", "GROVE", "ICE_SPIKES",
    "JAGGED_PEAKS", "JUNGLE", "LUKEWARM_OCEAN", "LUSH_CAVES", "MANGROVE_SWAMP", "MEADOW",
    "MUSHROOM_FIELDS", "NETHER_WASTES", "OCEAN", "OLD_GROWTH_BIRCH_FOREST",
    "OLD_GROWTH_PINE_TAIGA", "OLD_GROWTH_SPRUCE_TAIGA", "PALE_GARDEN", "PLAINS", "RIVER",
    "SAVANNA", "SAVANNA_PLATEAU", "SMALL_END_ISLANDS", "SNOWY_BEACH", "SNOWY_PLAINS",
    "SNOWY_SLOPES", "SNOWY_TAIGA", "SOUL_SAND_VALLEY", "SPARSE_JUNGLE", "STONY_PEAKS",
    "STONY_SHORE", "SUNFLOWER_PLAINS", "SWAMP", "TAIGA", "THE_END", "THE_VOID",
    "WARM_OCEAN", "WARPED_FOREST", "WINDSWEPT_FOREST", "WINDSWEPT_GRAVELLY_HILLS",
    "WINDSWEPT_HILLS", "WINDSWEPT_SAVANNA", "WOODED_BADLANDS",
];

const ENCHANTMENTS: &[&str] = &[
    "AQUA_AFFINITY", "BANE_OF_ARTHROPODS", "BINDING_CURSE", "BLAST_PROTECTION", "BREACH",
    "CHANNELING", "DENSITY", "DEPTH_STRIDER", "EFFICIENCY", "FEATHER_FALLING", "FIRE_ASPECT",
    "FIRE_PROTECTION", "FLAME", "FORTUNE", "FROST_WALKER", "IMPALING", "INFINITY",
    "KNOCKBACK", "LOOTING", "LOYALTY", "LUCK_OF_THE_SEA", "LURE", "MENDING", "MULTISHOT",
    "PIERCING", "POWER", "PROJECTILE_PROTECTION", "PROTECTION", "PUNCH", "QUICK_CHARGE",
    "RESPIRATION", "RIPTIDE", "SHARPNESS", "SILK_TOUCH", "SMITE", "SOUL_SPEED",
    "SWEEPING_EDGE", "SWIFT_SNEAK", "THORNS", "UNBREAKING", "VANISHING_CURSE", "WIND_BURST",
];

const ENCHANTMENT_ALIASES: &[(&str, &str)] = &[
    ("ARROW_DAMAGE", "POWER"),
    ("ARROW_FIRE", "FLAME"),
    ("ARROW_INFINITE", "INFINITY"),
    ("ARROW_KNOCKBACK", "PUNCH"),
    ("DAMAGE_ALL", "SHARPNESS"),
    ("DAMAGE_ARTHROPODS", "BANE_OF_ARTHROPODS"),
    ("DAMAGE_UNDEAD", "SMITE"),
    ("DIG_SPEED", "EFFICIENCY"),
    ("DURABILITY", "UNBREAKING"),
    ("LOOT_BONUS_BLOCKS", "FORTUNE"),
    ("LOOT_BONUS_MOBS", "LOOTING"),
    ("LUCK", "LUCK_OF_THE_SEA"),
    ("OXYGEN", "RESPIRATION"),
    ("PROTECTION_ENVIRONMENTAL", "PROTECTION"),
    ("PROTECTION_EXPLOSIONS", "BLAST_PROTECTION"),
    ("PROTECTION_FALL", "FEATHER_FALLING"),
    ("PROTECTION_FIRE", "FIRE_PROTECTION"),
    ("PROTECTION_PROJECTILE", "PROJECTILE_PROTECTION"),
    ("SWEEPING", "SWEEPING_EDGE"),
    ("WATER_WORKER", "AQUA_AFFINITY"),
];

const EQUIPMENT_SLOTS: &[&str] = &[
    "HEAD", "CHEST", "LEGS", "FEET", "HAND", "OFFHAND", "BODY", "0", "1", "2", "3", "4", "5",
];

const MOB_OPTIONS: &[&str] = &[
    "AlwaysShowName", "ApplyInvisibility", "AttackSpeed", "Collidable", "Despawn",
    "DigOutOfGround", "FollowRange", "Glowing", "HealOnReload", "Interactable", "Invincible",
    "Invisible", "KnockbackResistance", "LockPitch", "MaxCombatDistance", "MovementSpeed",
    "NoAI", "NoDamageTicks", "NoGravity", "PassthroughDamage", "Persistent",
    "PreventItemPickup", "PreventJockeyMounts", "PreventLeashing", "PreventMobKillDrops",
    "PreventOtherDrops", "PreventRandomEquipment", "PreventRenaming", "PreventSlimeSplit",
    "PreventSunburn", "PreventTransformation", "RandomizeProperties", "RepeatAllSkills",
    "ShowHealth", "Silent", "Tracking", "UseThreatTable", "VisibleByDefault", "Age",
    "AgeLock", "Adult", "Baby", "Angry", "Anger", "CanPickupItems", "CarriedBlock",
    "Color", "HasArms", "HasBasePlate", "HasGravity", "HorseColor", "HorseStyle",
    "HorseType", "Marker", "Profession", "Saddled", "Size", "Small", "Tamed", "Type",
    "Variant", "CatType", "Invulnerable", "ReviveHealth", "ItemHead", "ItemBody",
    "ItemLegs", "ItemFeet", "ItemHand", "ItemOffhand", "PreventPickup",
];

const MECHANICS: &[&str] = &[
    "activatespawner", "arrowvolley", "atom", "aura", "auraremove", "barcreate",
    "barremove", "barset", "basedamage", "blackscreen", "blockdestabilize", "blockmask",
    "blockphysics", "blockunmask", "blockwave", "bloodyscreen", "bonemeal", "bossborder",
    "bouncy", "breakblock", "cancelevent", "cast", "chain", "chainmissile", "clearthreat",
    "closeinventory", "command", "consume", "consumeslot", "damage", "decapitate", "delay",
    "directionalvelocity", "disengage", "disguise", "dismount", "displaytransformation",
    "doppleganger", "dropitem", "ejectpassenger", "effect", "ender", "enderbeam",
    "enderdragonresetcrystals", "enderdragonsetphase", "enderdragonspawnportal", "endprojectile",
    "equip", "explosion", "extinguish", "fakeexplosion", "fakelightning", "feed",
    "firework", "flames", "fly", "forcepull", "freeze", "geyser", "give", "giveitem",
    "globalcooldown", "glow", "goto", "gravity", "guardianbeam", "heal", "healpercent",
    "hide", "hit", "hologram", "ignite", "itemspray", "jsonmessage", "jump", "leap",
    "lightning", "look", "lunge", "message", "meta", "metaskill", "missile", "modifydamage",
    "modifyglobalscore", "modifymobscore", "modifyprojectile", "modifyscore",
    "modifytargetscore", "mount", "mounttarget", "movepin", "orbital", "oxygen",
    "particles", "particlebox", "particleequation", "particleline", "particlelinehelix",
    "particlelinering", "particleorbital", "particlering", "particlesphere",
    "particletornado", "percentdamage", "percentheal", "pickupitem", "playanimation",
    "playblockbreaksound", "playblockfallsound", "playblockhitsound", "playblockplacesound",
    "playblockstepsound", "potion", "potionclear", "prison", "projectile", "propel", "pull",
    "pushblock", "pushbutton", "rally", "randommessage", "randomskill", "raytrace",
    "raytraceto", "recoil", "remount", "remove", "removeheldItem", "removeowner", "resetai",
    "rotatetowards", "runaigoalselector", "runaitargetselector", "saddle", "say",
    "sendactionmessage", "sendresourcepack", "sendtitle", "sendtoast", "setai",
    "setblockopen", "setblocktype", "setchunkforceloaded", "setcollidable", "setdragonpodium",
    "setfaction", "setflying", "setgamemode", "setgliding", "setglobalcooldown",
    "setgravity", "sethealth", "setinteractionsize", "setitemgroupcooldown", "setlevel",
    "setmaxhealth", "setmobcolor", "setmobscore", "setname", "setnodamageticks", "setowner",
    "setparent", "setpathfindingmalus", "setpitch", "setpose", "setrotation",
    "setskillcooldown", "setspeed", "setstance", "settarget", "settargetscore",
    "setvariable", "shield", "shieldbreak", "shieldpercent", "shoot", "shootfireball",
    "shootpotion", "shootshulkerbullet", "shootskull", "showentity", "signal", "skill",
    "skybox", "smoke", "smokeswirl", "sound", "spin", "spring", "stealitem", "stopsound",
    "stun", "sudoskill", "suicide", "summon", "summonareaeffectcloud", "summonfallingblock",
    "summonpassenger", "swap", "switch", "takeitem", "teleport", "teleportto", "teleporty",
    "threat", "time", "tossitem", "totem", "trade", "undisguise", "undopaste",
    "variableadd", "variablemath", "variablesubtract", "variableunset", "velocity", "volley",
    "weather", "wolfsit", "worldedit", "onattack", "onbowhit", "ondamaged", "onblockbreak",
    "onblockplace", "onchat", "onjump", "onshoot", "onswing", "oninteract",
];

const CONDITION_ACTIONS: &[&str] = &[
    "true", "false", "power", "cast", "castinstead", "orelsecast", "required", "cancel",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            version: "1.21".to_string(),
            materials: owned(MATERIALS),
            entity_types: owned(ENTITY_TYPES),
            biomes: owned(BIOMES),
            enchantments: owned(ENCHANTMENTS),
            enchantment_aliases: ENCHANTMENT_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            equipment_slots: owned(EQUIPMENT_SLOTS),
            mob_options: owned(MOB_OPTIONS),
            mechanics: owned(MECHANICS),
            condition_actions: owned(CONDITION_ACTIONS),
        }
    }
}

impl GameData {
    pub fn tables(&self) -> GameTables {
        GameTables::from(self)
    }
}

/// Hash-indexed, case-folded view of [`GameData`].
#[derive(Debug, Clone, Default)]
pub struct GameTables {
    materials: HashSet<String>,
    entity_types: HashSet<String>,
    biomes: HashSet<String>,
    enchantments: HashSet<String>,
    enchantment_aliases: HashMap<String, String>,
    equipment_slots: HashSet<String>,
    mob_options: HashSet<String>,
    mechanics: HashSet<String>,
    condition_actions: HashSet<String>,
}

fn upper_set(items: &[String]) -> HashSet<String> {
    items.iter().map(|s| s.to_ascii_uppercase()).collect()
}

fn lower_set(items: &[String]) -> HashSet<String> {
    items.iter().map(|s| s.to_ascii_lowercase()).collect()
}

/// `minecraft:diamond_sword` -> `DIAMOND_SWORD`
fn material_key(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_prefix("minecraft:").unwrap_or(name);
    name.to_ascii_uppercase()
}

impl From<&GameData> for GameTables {
    fn from(data: &GameData) -> Self {
        Self {
            materials: upper_set(&data.materials),
            entity_types: upper_set(&data.entity_types),
            biomes: upper_set(&data.biomes),
            enchantments: upper_set(&data.enchantments),
            enchantment_aliases: data
                .enchantment_aliases
                .iter()
                .map(|(from, to)| (from.to_ascii_uppercase(), to.to_ascii_uppercase()))
                .collect(),
            equipment_slots: upper_set(&data.equipment_slots),
            mob_options: lower_set(&data.mob_options),
            mechanics: lower_set(&data.mechanics),
            condition_actions: lower_set(&data.condition_actions),
        }
    }
}

impl GameTables {
    pub fn is_material(&self, name: &str) -> bool {
        self.materials.contains(&material_key(name))
    }

    pub fn is_entity_type(&self, name: &str) -> bool {
        self.entity_types.contains(&material_key(name))
    }

    pub fn is_biome(&self, name: &str) -> bool {
        self.biomes.contains(&material_key(name))
    }

    pub fn is_equipment_slot(&self, slot: &str) -> bool {
        self.equipment_slots.contains(&slot.trim().to_ascii_uppercase())
    }

    pub fn is_mob_option(&self, option: &str) -> bool {
        self.mob_options.contains(&option.trim().to_ascii_lowercase())
    }

    pub fn is_mechanic(&self, mechanic: &str) -> bool {
        self.mechanics.contains(&mechanic.trim().to_ascii_lowercase())
    }

    pub fn is_condition_action(&self, action: &str) -> bool {
        self.condition_actions
            .contains(&action.trim().to_ascii_lowercase())
    }

    /// Map a legacy enchantment name to its current name; unknown names pass
    /// through uppercased.
    pub fn normalize_enchantment(&self, name: &str) -> String {
        let key = material_key(name);
        self.enchantment_aliases.get(&key).cloned().unwrap_or(key)
    }

    pub fn is_enchantment(&self, name: &str) -> bool {
        self.enchantments.contains(&self.normalize_enchantment(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_lookup() {
        let tables = GameData::default().tables();
        assert!(tables.is_material("diamond_sword"));
        assert!(tables.is_material("minecraft:DIAMOND"));
        assert!(!tables.is_material("KingsCrown"));
        assert!(tables.is_entity_type("zombie"));
        assert!(tables.is_biome("plains"));
        assert!(tables.is_mob_option("preventsunburn"));
        assert!(tables.is_mechanic("Damage"));
        assert!(!tables.is_mechanic("fireball"));
        assert!(tables.is_condition_action("OrElseCast"));
    }

    #[test]
    fn test_enchantment_aliases() {
        let tables = GameData::default().tables();
        assert_eq!(tables.normalize_enchantment("DAMAGE_ALL"), "SHARPNESS");
        assert_eq!(tables.normalize_enchantment("durability"), "UNBREAKING");
        assert_eq!(tables.normalize_enchantment("sharpness"), "SHARPNESS");
        assert!(tables.is_enchantment("LOOT_BONUS_MOBS"));
        assert!(!tables.is_enchantment("SUPER_SHARP"));
    }

    #[test]
    fn test_game_data_yaml_round_trip() {
        let data = GameData::default();
        let yaml = serde_yaml_ng::to_string(&data).unwrap();
        let loaded: GameData = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(loaded, data);
    }
}
