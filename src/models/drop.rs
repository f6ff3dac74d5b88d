//! Drop line decoding.
//!
//! A MythicMobs drop line looks like `name{attr=value;...} amount chance`.
//! Attribute blocks may appear more than once and anywhere in the line.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropKind {
    #[serde(rename = "item")]
    Item,
    #[serde(rename = "mythicitem")]
    MythicItem,
    #[serde(rename = "exp")]
    Exp,
    #[serde(rename = "mythicmob")]
    MythicMob,
    #[serde(rename = "mcmmo-exp")]
    McmmoExp,
    #[serde(rename = "money")]
    Money,
    #[serde(rename = "command")]
    Command,
    #[serde(rename = "mmoitems")]
    MmoItems,
    #[serde(rename = "itemvariable")]
    ItemVariable,
    #[serde(rename = "nothing")]
    Nothing,
    #[serde(rename = "droptable")]
    DropTable,
    #[serde(rename = "loottable")]
    LootTable,
}

/// One decoded drop line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropDefinition {
    #[serde(rename = "type")]
    pub kind: DropKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mob: Option<String>,
    pub amount: String,
    pub chance: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

fn attribute_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^{}]*)\}").expect("Invalid attribute block regex"))
}

/// Parse `key=value;key=value` into an ordered map. Keys keep their spelling.
pub fn parse_attributes(block: &str) -> IndexMap<String, String> {
    block
        .split(';')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Remove the first of `keys` (case-insensitive) and return its value.
fn take_attribute(attributes: &mut IndexMap<String, String>, keys: &[&str]) -> Option<String> {
    let mut found = None;
    attributes.retain(|key, value| {
        if keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
            if found.is_none() {
                found = Some(value.clone());
            }
            false
        } else {
            true
        }
    });
    found
}

/// Uppercase-only names (`DIAMOND`, `GOLD_INGOT`) are vanilla materials.
fn is_vanilla_style(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Strip a YAML-style list marker some files keep inside the string.
pub fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim();
    if trimmed == "-" {
        return "";
    }
    trimmed
        .strip_prefix("- ")
        .map(str::trim_start)
        .unwrap_or(trimmed)
}

impl DropDefinition {
    /// Decode a drop line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = strip_list_marker(line);
        if line.is_empty() {
            return None;
        }

        let mut attributes = IndexMap::new();
        for capture in attribute_block_pattern().captures_iter(line) {
            attributes.extend(parse_attributes(&capture[1]));
        }
        let stripped = attribute_block_pattern().replace_all(line, "");

        let mut tokens = stripped.split_whitespace();
        let base = tokens.next()?.to_string();
        let amount = tokens.next().unwrap_or("1").to_string();
        let chance = tokens.next().unwrap_or("1.0").to_string();

        let mut drop = DropDefinition {
            kind: DropKind::Item,
            item: None,
            table: None,
            mob: None,
            amount,
            chance,
            attributes,
        };

        match base.to_ascii_lowercase().as_str() {
            "exp" => drop.kind = DropKind::Exp,
            "mythicmob" => {
                drop.kind = DropKind::MythicMob;
                drop.mob = take_attribute(&mut drop.attributes, &["m", "mob", "type"]);
            }
            "mythicitem" => {
                drop.kind = DropKind::MythicItem;
                drop.item = take_attribute(&mut drop.attributes, &["i", "item"]);
            }
            "mcmmo-exp" => drop.kind = DropKind::McmmoExp,
            "money" => drop.kind = DropKind::Money,
            "cmd" | "command" => drop.kind = DropKind::Command,
            "mmoitems" => drop.kind = DropKind::MmoItems,
            "itemvariable" => drop.kind = DropKind::ItemVariable,
            "nothing" => drop.kind = DropKind::Nothing,
            "droptable" => {
                drop.kind = DropKind::DropTable;
                drop.table = take_attribute(&mut drop.attributes, &["dt", "table", "droptable"]);
            }
            _ if base.contains(':') => {
                drop.kind = DropKind::LootTable;
                drop.table = Some(base);
            }
            // A vanilla material only when written bare. Attribute blocks are
            // how MythicMobs customizes an item, so `DIAMOND_SWORD{...}` names
            // a pack item and must resolve against the pack's Items.
            _ if is_vanilla_style(&base) && drop.attributes.is_empty() => {
                drop.kind = DropKind::Item;
                drop.item = Some(base);
            }
            _ => {
                drop.kind = DropKind::MythicItem;
                drop.item = Some(base);
            }
        }

        Some(drop)
    }

    /// Whether the amount is `N` or a range `N-M`.
    pub fn amount_is_valid(&self) -> bool {
        let mut parts = self.amount.splitn(2, '-');
        let low = parts.next().map(|p| p.trim().parse::<f64>().is_ok());
        let high = parts.next().map(|p| p.trim().parse::<f64>().is_ok());
        matches!((low, high), (Some(true), None) | (Some(true), Some(true)))
    }

    pub fn chance_value(&self) -> Option<f64> {
        self.chance.trim().parse::<f64>().ok()
    }
}
