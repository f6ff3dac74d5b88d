//! Case-insensitive view over a YAML section.
//!
//! MythicMobs treats configuration keys case-insensitively (`Health`, `health`
//! and `HEALTH` are the same field). [`CiRecord`] folds keys once on
//! construction so every lookup afterwards is a hash probe: exact key first,
//! then the folded key.

use indexmap::IndexMap;
use serde_yaml_ng::{Mapping, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CiRecord {
    fields: IndexMap<String, Value>,
    /// lowercase key -> original key (first occurrence wins)
    folded: HashMap<String, String>,
}

impl CiRecord {
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let mut record = Self::default();
        for (key, value) in mapping {
            if let Some(key) = key_to_string(key) {
                record.insert(key, value.clone());
            }
        }
        record
    }

    /// Build a record from a value, or `None` if the value is not a mapping.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Mapping(mapping) => Some(Self::from_mapping(mapping)),
            _ => None,
        }
    }

    fn insert(&mut self, key: String, value: Value) {
        self.folded
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| key.clone());
        self.fields.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Original spelling of `key` as written in the file.
    pub fn original_key(&self, key: &str) -> Option<&str> {
        if let Some((k, _)) = self.fields.get_key_value(key) {
            return Some(k.as_str());
        }
        self.folded.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).or_else(|| {
            self.folded
                .get(&key.to_ascii_lowercase())
                .and_then(|original| self.fields.get(original))
        })
    }

    /// First of `keys` that is present and not null.
    pub fn get_any(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(value_to_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(value_to_bool)
    }

    pub fn get_lines(&self, key: &str) -> Vec<String> {
        self.get(key).map(value_to_lines).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Fields whose folded key is not in `known` (already lowercase).
    pub fn unknown_fields(&self, known: &[&str]) -> IndexMap<String, Value> {
        self.fields
            .iter()
            .filter(|(key, _)| !known.contains(&key.to_ascii_lowercase().as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Render a mapping key as a string. Only scalar keys are meaningful here.
pub fn key_to_string(key: &Value) -> Option<String> {
    scalar_to_string(key)
}

pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numbers may be written quoted in MythicMobs files.
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// A list field (skills, drops, conditions, ...). A lone scalar counts as a
/// one-line list.
pub fn value_to_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        Value::Null => Vec::new(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(yaml: &str) -> CiRecord {
        let value: Value = serde_yaml_ng::from_str(yaml).unwrap();
        CiRecord::from_value(&value).unwrap()
    }

    #[test]
    fn test_lookup_ignores_case() {
        let r = record("MobType: ZOMBIE\nhealth: 40\n");
        assert_eq!(r.get_string("mobtype").as_deref(), Some("ZOMBIE"));
        assert_eq!(r.get_f64("Health"), Some(40.0));
        assert_eq!(r.original_key("HEALTH"), Some("health"));
        assert!(!r.contains("Damage"));
    }

    #[test]
    fn test_exact_key_wins_over_folded() {
        let r = record("Type: ZOMBIE\ntype: SKELETON\n");
        assert_eq!(r.get_string("type").as_deref(), Some("SKELETON"));
        assert_eq!(r.get_string("Type").as_deref(), Some("ZOMBIE"));
        assert_eq!(r.get_string("TYPE").as_deref(), Some("ZOMBIE"));
    }

    #[test]
    fn test_quoted_numbers_and_lines() {
        let r = record("Health: '25.5'\nSkills: single line\nDrops:\n- DIAMOND 1 1\n- exp 5\n");
        assert_eq!(r.get_f64("health"), Some(25.5));
        assert_eq!(r.get_lines("skills"), vec!["single line".to_string()]);
        assert_eq!(r.get_lines("drops").len(), 2);
        assert!(r.get_lines("missing").is_empty());
    }

    #[test]
    fn test_unknown_fields() {
        let r = record("MobType: ZOMBIE\nBossBar: {}\n");
        let extra = r.unknown_fields(&["mobtype"]);
        assert_eq!(extra.len(), 1);
        assert!(extra.contains_key("BossBar"));
    }
}
