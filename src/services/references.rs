//! Just enough of the MythicMobs line DSL to find cross-references.
//!
//! Skill lines look like `- mechanic{attr=value;...} @targeter ~trigger ?cond`,
//! condition lines like `- condition{args} action [argument]`. Neither is
//! fully validated; lines are checked for balanced brackets and decoded far
//! enough to pull out the skills, items and mobs they name.

use crate::models::drop::strip_list_marker;
use crate::models::record::scalar_to_string;
use crate::models::{FolderType, GameTables};
use indexmap::IndexMap;
use serde_yaml_ng::Value;

/// A named pointer from one entry to another entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: FolderType,
    pub name: String,
}

impl Reference {
    pub fn new(kind: FolderType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillLine {
    pub mechanic: String,
    pub attributes: IndexMap<String, String>,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionLine {
    pub condition: String,
    pub action: Option<String>,
    pub references: Vec<Reference>,
}

/// Attributes whose value names a skill to run.
const SKILL_CALLBACK_KEYS: &[&str] = &[
    "ontick", "ot", "onhit", "oh", "onend", "oe", "onstart", "os", "onshoot", "onbounce",
    "onblockhit", "oninteract",
];

const CAST_ACTIONS: &[&str] = &["cast", "castinstead", "orelsecast"];

/// Closing bracket for an opening one.
fn closer(open: char) -> char {
    match open {
        '{' => '}',
        '[' => ']',
        _ => ')',
    }
}

/// Brackets balance outside double-quoted text.
pub fn check_balanced(line: &str) -> Result<(), String> {
    let mut stack = Vec::new();
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            _ if quoted => {}
            '{' | '[' | '(' => stack.push(closer(c)),
            '}' | ']' | ')' => match stack.pop() {
                Some(expected) if expected == c => {}
                _ => return Err(format!("Unexpected '{}'", c)),
            },
            _ => {}
        }
    }
    if quoted {
        return Err("Unclosed quote".to_string());
    }
    match stack.last() {
        Some(missing) => Err(format!("Missing '{}'", missing)),
        None => Ok(()),
    }
}

/// Split on `sep` only at bracket depth zero.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;
    for (index, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            _ if quoted => {}
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Contents of the bracket block opening at the start of `text`.
fn leading_block(text: &str) -> Option<&str> {
    if !text.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    for (index, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[1..index]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Remove every `{...}` block, keeping the surrounding text.
fn strip_blocks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// `key=value;key=value` with nested blocks left intact.
pub fn parse_mechanic_attributes(block: &str) -> IndexMap<String, String> {
    split_top_level(block, ';')
        .into_iter()
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

fn attribute<'a>(attributes: &'a IndexMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| keys.iter().any(|k| k.eq_ignore_ascii_case(key)))
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

/// `Sword:2` / `minecraft:stone` -> base name without a trailing `:suffix`.
fn without_suffix(name: &str) -> &str {
    if name.starts_with("minecraft:") {
        return name;
    }
    name.split(':').next().unwrap_or(name)
}

/// Decode one skill line. Blank lines and unbalanced brackets are errors.
pub fn parse_skill_line(line: &str, tables: &GameTables) -> Result<SkillLine, String> {
    let body = strip_list_marker(line);
    if body.is_empty() {
        return Err("Empty skill line".to_string());
    }
    check_balanced(body)?;

    let end = body
        .find(|c: char| matches!(c, '{' | '@' | '~' | '?') || c.is_whitespace())
        .unwrap_or(body.len());
    let token = &body[..end];
    if token.is_empty() {
        return Err("Skill line has no mechanic".to_string());
    }

    let attributes = leading_block(&body[end..])
        .map(parse_mechanic_attributes)
        .unwrap_or_default();

    let mut references = Vec::new();
    if let Some((prefix, rest)) = token.split_once(':') {
        // `skill:Name`; other prefixed forms (`effect:particles`, `e:p`) are mechanics.
        if prefix.eq_ignore_ascii_case("skill") && !rest.is_empty() {
            references.push(Reference::new(FolderType::Skills, rest));
        }
    } else {
        match token.to_ascii_lowercase().as_str() {
            "skill" | "metaskill" | "meta" | "sudoskill" => {
                if let Some(skill) = attribute(&attributes, &["s", "skill", "$skill", "meta", "m"]) {
                    if !skill.starts_with('[') {
                        references.push(Reference::new(FolderType::Skills, skill));
                    }
                }
            }
            "randomskill" => {
                if let Some(skills) = attribute(&attributes, &["skills", "s"]) {
                    references.extend(
                        skills
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| Reference::new(FolderType::Skills, s)),
                    );
                }
            }
            "give" | "giveitem" | "dropitem" | "equip" | "takeitem" | "tossitem" => {
                if let Some(item) = attribute(&attributes, &["item", "i"]) {
                    let item = without_suffix(item);
                    if !tables.is_material(item) {
                        references.push(Reference::new(FolderType::Items, item));
                    }
                }
            }
            "summon" | "summonpassenger" => {
                if let Some(mob) = attribute(&attributes, &["type", "t", "mob", "m"]) {
                    let mob = without_suffix(mob);
                    if !tables.is_entity_type(mob) {
                        references.push(Reference::new(FolderType::Mobs, mob));
                    }
                }
            }
            _ if !tables.is_mechanic(token) => {
                // Unknown mechanic names run a skill of that name.
                references.push(Reference::new(FolderType::Skills, token));
            }
            _ => {}
        }
    }

    for (key, value) in &attributes {
        let key = key.to_ascii_lowercase();
        if SKILL_CALLBACK_KEYS.contains(&key.as_str()) && !value.is_empty() && !value.starts_with('[') {
            references.push(Reference::new(FolderType::Skills, value.as_str()));
        }
    }

    Ok(SkillLine {
        mechanic: token.to_string(),
        attributes,
        references,
    })
}

fn is_condition_name(token: &str) -> bool {
    let token = token.trim_start_matches('!');
    let mut chars = token.chars();
    chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
}

/// Decode one condition line.
pub fn parse_condition_line(line: &str, tables: &GameTables) -> Result<ConditionLine, String> {
    let body = strip_list_marker(line);
    if body.is_empty() {
        return Err("Empty condition".to_string());
    }
    check_balanced(body)?;

    let stripped = strip_blocks(body).replace(['(', ')'], " ");
    let segments: Vec<&str> = stripped
        .split("||")
        .flat_map(|segment| segment.split("&&"))
        .collect();

    let mut condition = String::new();
    let mut tail: Vec<&str> = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        let tokens: Vec<&str> = segment.split_whitespace().collect();
        let Some((name, rest)) = tokens.split_first() else {
            return Err("Missing condition name".to_string());
        };
        if !is_condition_name(name) {
            return Err(format!("Invalid condition name '{}'", name));
        }
        if index == 0 {
            condition = name.trim_start_matches('!').to_string();
        }
        if index == segments.len() - 1 {
            tail = rest.to_vec();
        }
    }

    let mut references = Vec::new();
    let is_cast = |word: &str| CAST_ACTIONS.iter().any(|a| a.eq_ignore_ascii_case(word));
    let action = match tail.as_slice() {
        [] => None,
        [action] if is_cast(*action) => {
            return Err(format!("'{}' requires a skill name", action));
        }
        [action] if action.eq_ignore_ascii_case("power") => {
            return Err("'power' requires a number".to_string());
        }
        [action] if tables.is_condition_action(action) => Some(action.to_ascii_lowercase()),
        [action] => return Err(format!("Unknown condition action '{}'", action)),
        [action, skill] if is_cast(*action) => {
            references.push(Reference::new(FolderType::Skills, *skill));
            Some(action.to_ascii_lowercase())
        }
        [action, amount] if action.eq_ignore_ascii_case("power") => {
            if amount.parse::<f64>().is_err() {
                return Err(format!("'power' expects a number, got '{}'", amount));
            }
            Some("power".to_string())
        }
        _ => return Err(format!("Unexpected text after condition: '{}'", tail.join(" "))),
    };

    Ok(ConditionLine {
        condition,
        action,
        references,
    })
}

/// `(slot, item)` pairs from either `["Item SLOT", "Item:SLOT"]` or `{SLOT: Item}`.
pub fn parse_equipment(value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Mapping(mapping) => mapping
            .iter()
            .filter_map(|(slot, item)| Some((scalar_to_string(slot)?, scalar_to_string(item)?)))
            .map(|(slot, item)| (slot.trim().to_string(), item.trim().to_string()))
            .collect(),
        Value::Sequence(lines) => lines
            .iter()
            .filter_map(scalar_to_string)
            .map(|line| {
                let line = strip_list_marker(&line).to_string();
                let split = line
                    .rsplit_once(char::is_whitespace)
                    .or_else(|| line.rsplit_once(':'));
                match split {
                    Some((item, slot)) => (slot.trim().to_string(), item.trim().to_string()),
                    None => (String::new(), line.clone()),
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `(name, level)` from `"NAME LEVEL"`, `"NAME:LEVEL"` or `{type|name, level}`.
pub fn parse_enchantment(value: &Value) -> Option<(String, Option<String>)> {
    match value {
        Value::Mapping(mapping) => {
            let record = crate::models::CiRecord::from_mapping(mapping);
            let name = record
                .get_any(&["type", "name", "enchantment", "id"])
                .and_then(scalar_to_string)?;
            let level = record.get("level").and_then(scalar_to_string);
            Some((name.trim().to_string(), level))
        }
        other => {
            let text = scalar_to_string(other)?;
            let text = strip_list_marker(&text);
            if text.is_empty() {
                return None;
            }
            let (name, level) = match text.split_once(char::is_whitespace) {
                Some((name, level)) => (name, Some(level.trim().to_string())),
                None => match text.rsplit_once(':') {
                    Some((name, level)) if !name.eq_ignore_ascii_case("minecraft") => {
                        (name, Some(level.trim().to_string()))
                    }
                    _ => (text, None),
                },
            };
            Some((name.trim().to_string(), level))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameData;

    fn tables() -> GameTables {
        GameData::default().tables()
    }

    fn skill_refs(line: &str) -> Vec<Reference> {
        parse_skill_line(line, &tables()).unwrap().references
    }

    #[test]
    fn test_known_mechanic_has_no_references() {
        let line = parse_skill_line("- damage{a=10} @target", &tables()).unwrap();
        assert_eq!(line.mechanic, "damage");
        assert_eq!(line.attributes.get("a").map(String::as_str), Some("10"));
        assert!(line.references.is_empty());
    }

    #[test]
    fn test_unknown_mechanic_is_a_skill_reference() {
        assert_eq!(
            skill_refs("- fireball true"),
            vec![Reference::new(FolderType::Skills, "fireball")]
        );
    }

    #[test]
    fn test_explicit_skill_forms() {
        assert_eq!(
            skill_refs("- skill{s=FireBall} @self"),
            vec![Reference::new(FolderType::Skills, "FireBall")]
        );
        assert_eq!(
            skill_refs("- skill:Heal @self ~onDamaged"),
            vec![Reference::new(FolderType::Skills, "Heal")]
        );
        assert!(skill_refs("- effect:particles{p=flame;a=10} @self").is_empty());
    }

    #[test]
    fn test_projectile_callbacks() {
        let refs = skill_refs("- projectile{onTick=Tick;onHit=Hit;onEnd=[ - damage{a=1} ];v=8} @target");
        assert_eq!(
            refs,
            vec![
                Reference::new(FolderType::Skills, "Tick"),
                Reference::new(FolderType::Skills, "Hit"),
            ]
        );
    }

    #[test]
    fn test_item_and_mob_references() {
        assert_eq!(
            skill_refs("- give{item=KingsCrown:1} @trigger"),
            vec![Reference::new(FolderType::Items, "KingsCrown")]
        );
        assert!(skill_refs("- give{item=DIAMOND} @trigger").is_empty());
        assert_eq!(
            skill_refs("- summon{type=Minion;amount=2} @self"),
            vec![Reference::new(FolderType::Mobs, "Minion")]
        );
        assert!(skill_refs("- summon{type=ZOMBIE} @self").is_empty());
    }

    #[test]
    fn test_unbalanced_skill_line() {
        assert!(parse_skill_line("- damage{a=10 @target", &tables()).is_err());
        assert!(parse_skill_line("- ", &tables()).is_err());
    }

    #[test]
    fn test_condition_lines() {
        let t = tables();
        let line = parse_condition_line("- health{h=<50%} true", &t).unwrap();
        assert_eq!(line.condition, "health");
        assert_eq!(line.action.as_deref(), Some("true"));

        let line = parse_condition_line("- incombat castinstead Heal", &t).unwrap();
        assert_eq!(line.references, vec![Reference::new(FolderType::Skills, "Heal")]);

        assert!(parse_condition_line("- incombat power 2.5", &t).is_ok());
        assert!(parse_condition_line("- incombat", &t).unwrap().action.is_none());
        assert!(parse_condition_line("- incombat true || onground true", &t).is_ok());
    }

    #[test]
    fn test_invalid_condition_lines() {
        let t = tables();
        assert!(parse_condition_line("- incombat power lots", &t).is_err());
        assert!(parse_condition_line("- incombat maybe", &t).is_err());
        assert!(parse_condition_line("- incombat cast", &t).is_err());
        assert!(parse_condition_line("- health{h=<50% true", &t).is_err());
        assert!(parse_condition_line("- 5health true", &t).is_err());
    }

    #[test]
    fn test_equipment_forms() {
        let list: Value = serde_yaml_ng::from_str("- KingsCrown HEAD\n- IRON_SWORD:HAND\n").unwrap();
        assert_eq!(
            parse_equipment(&list),
            vec![
                ("HEAD".to_string(), "KingsCrown".to_string()),
                ("HAND".to_string(), "IRON_SWORD".to_string()),
            ]
        );
        let map: Value = serde_yaml_ng::from_str("HEAD: KingsCrown\n").unwrap();
        assert_eq!(
            parse_equipment(&map),
            vec![("HEAD".to_string(), "KingsCrown".to_string())]
        );
    }

    #[test]
    fn test_enchantment_forms() {
        let plain = Value::String("SHARPNESS 5".to_string());
        assert_eq!(
            parse_enchantment(&plain),
            Some(("SHARPNESS".to_string(), Some("5".to_string())))
        );
        let colon = Value::String("DAMAGE_ALL:3".to_string());
        assert_eq!(
            parse_enchantment(&colon),
            Some(("DAMAGE_ALL".to_string(), Some("3".to_string())))
        );
        let object: Value = serde_yaml_ng::from_str("Type: LOOTING\nLevel: 2\n").unwrap();
        assert_eq!(
            parse_enchantment(&object),
            Some(("LOOTING".to_string(), Some("2".to_string())))
        );
    }
}
