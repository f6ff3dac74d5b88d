//! Tolerant YAML parsing for a single pack file.
//!
//! Parse problems are reported as [`ParseIssue`]s on the returned
//! [`ParsedFile`]; nothing here returns `Err`. Repeated keys resolve last-wins
//! at every nesting level, and repeated top-level keys are additionally
//! reported as `duplicate-key` warnings by a separate line scan. Merge keys
//! (`<<: *anchor`) are expanded, with the mapping's own keys taking precedence.

use crate::models::record::{CiRecord, key_to_string};
use crate::models::{
    FolderType, PackInfo, ParseIssue, ParseIssueKind, ParsedEntry, ParsedFile, ScannedFile,
};
use regex::Regex;
use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_yaml_ng::value::{Tag, TaggedValue};
use serde_yaml_ng::{Mapping, Number, Value};
use std::collections::HashMap;
use std::fmt;

/// Shown instead of parser messages too short to act on.
pub const GENERIC_SYNTAX_MESSAGE: &str =
    "possible syntax error: tabs, special characters, or invalid structure";

/// Lines of context shown on each side of a syntax error.
const SNIPPET_RADIUS: usize = 2;

/// A top-level key defined more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub key: String,
    /// 1-based line of the repeat.
    pub line: usize,
    /// 1-based line of the first definition.
    pub first_line: usize,
}

/// A YAML value whose mappings keep the last of any repeated key.
///
/// The stock `Value` deserializer rejects repeated keys; MythicMobs (and
/// most YAML loaders) silently keep the last one.
struct LastWins(Value);

impl<'de> Deserialize<'de> for LastWins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LastWinsVisitor).map(LastWins)
    }
}

struct LastWinsVisitor;

impl<'de> Visitor<'de> for LastWinsVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        LastWins::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(LastWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        let mut merges = Vec::new();
        while let Some((LastWins(key), LastWins(value))) = map.next_entry()? {
            if key.as_str() == Some(MERGE_KEY) {
                merges.push(value);
            } else {
                mapping.insert(key, value);
            }
        }
        for source in merges {
            merge_into(&mut mapping, source).map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (tag, variant): (String, _) = data.variant()?;
        let LastWins(value) = variant.newtype_variant()?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}

/// YAML merge key, `<<: *anchor` or `<<: [*a, *b]`.
const MERGE_KEY: &str = "<<";

/// Copy merged fields that the mapping does not define itself. With a list
/// of sources, earlier sources take precedence.
fn merge_into(mapping: &mut Mapping, source: Value) -> Result<(), String> {
    match source {
        Value::Mapping(fields) => {
            for (key, value) in fields {
                if !mapping.contains_key(&key) {
                    mapping.insert(key, value);
                }
            }
            Ok(())
        }
        Value::Sequence(sources) => sources
            .into_iter()
            .try_for_each(|source| match source {
                Value::Mapping(_) => merge_into(mapping, source),
                other => Err(format!(
                    "merge key `<<` lists {}, expected mappings",
                    type_name(&other)
                )),
            }),
        other => Err(format!(
            "merge key `<<` points at {}, expected a mapping or a list of mappings",
            type_name(&other)
        )),
    }
}

fn load_last_wins(text: &str) -> Result<Value, serde_yaml_ng::Error> {
    serde_yaml_ng::from_str::<LastWins>(text).map(|v| v.0)
}

/// Blank or comment-only text.
fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

/// Replace degenerate parser messages with something a pack author can act on.
pub fn humanize_message(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= 2 {
        GENERIC_SYNTAX_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Source lines around `line` (1-based), the failing one marked with `>`.
pub fn source_snippet(text: &str, line: usize) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    if line == 0 || line > lines.len() {
        return None;
    }
    let start = line.saturating_sub(SNIPPET_RADIUS).max(1);
    let end = (line + SNIPPET_RADIUS).min(lines.len());

    let snippet = (start..=end)
        .map(|n| {
            let marker = if n == line { '>' } else { ' ' };
            format!("{marker}{n:>4} | {}", lines[n - 1])
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(snippet)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Parser for individual pack files.
pub struct YamlFileParser {
    /// Unindented `Key:` at the start of a line.
    top_level_key: Regex,
}

impl YamlFileParser {
    pub fn new() -> Self {
        Self {
            top_level_key: Regex::new(r"^([\w][\w\-.]*):(?:\s|$)")
                .expect("Invalid top-level key regex"),
        }
    }

    /// Parse one file's text.
    pub fn parse(&self, raw_text: &str, relative_path: &str, folder_type: FolderType) -> ParsedFile {
        let text = raw_text.strip_prefix('\u{feff}').unwrap_or(raw_text);

        if is_blank_document(text) {
            let mut file = ParsedFile::empty(relative_path, folder_type);
            file.warnings
                .push(ParseIssue::new(ParseIssueKind::EmptyFile, "File is empty"));
            return file;
        }

        let value = match load_last_wins(text) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("YAML syntax error in {}: {}", relative_path, err);
                return ParsedFile::failed(relative_path, folder_type, self.syntax_error(&err, text));
            }
        };

        let mapping = match value {
            Value::Null => return ParsedFile::empty(relative_path, folder_type),
            Value::Mapping(mapping) => mapping,
            other => {
                let message = format!(
                    "Expected a mapping of named entries at the top level, found {}",
                    type_name(&other)
                );
                tracing::warn!("Invalid structure in {}: {}", relative_path, message);
                return ParsedFile::failed(
                    relative_path,
                    folder_type,
                    ParseIssue::new(ParseIssueKind::InvalidStructure, message),
                );
            }
        };

        let mut file = ParsedFile::empty(relative_path, folder_type);
        for (key, value) in mapping {
            match key_to_string(&key) {
                Some(name) => {
                    file.data.insert(name.clone(), value.clone());
                    file.entries.push(ParsedEntry { name, data: value });
                }
                None => file.warnings.push(ParseIssue::new(
                    ParseIssueKind::InvalidStructure,
                    format!("Ignoring top-level key that is {}", type_name(&key)),
                )),
            }
        }

        for duplicate in self.detect_duplicate_keys(text) {
            let mut warning = ParseIssue::new(
                ParseIssueKind::DuplicateKey,
                format!(
                    "Duplicate key \"{}\" at line {} (first defined at line {}); the last definition is used",
                    duplicate.key, duplicate.line, duplicate.first_line
                ),
            );
            warning.line = Some(duplicate.line);
            warning.first_line = Some(duplicate.first_line);
            warning.key = Some(duplicate.key);
            file.warnings.push(warning);
        }

        tracing::debug!(
            "Parsed {}: {} entries, {} warnings",
            relative_path,
            file.entries.len(),
            file.warnings.len()
        );
        file
    }

    /// Read and parse a scanned file. Read failures become `processing-error`.
    pub async fn parse_file(&self, file: &ScannedFile, folder_type: FolderType) -> ParsedFile {
        match file.source.read_text().await {
            Ok(text) => self.parse(&text, &file.relative_path, folder_type),
            Err(err) => {
                tracing::warn!("Failed to read {}: {}", file.relative_path, err);
                ParsedFile::failed(
                    &file.relative_path,
                    folder_type,
                    ParseIssue::new(
                        ParseIssueKind::ProcessingError,
                        format!("Failed to read file: {}", err),
                    ),
                )
            }
        }
    }

    /// Every repeated top-level key, in file order.
    pub fn detect_duplicate_keys(&self, text: &str) -> Vec<DuplicateKey> {
        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for (index, line) in text.lines().enumerate() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            let Some(captures) = self.top_level_key.captures(line) else {
                continue;
            };
            let Some(key) = captures.get(1).map(|m| m.as_str()) else {
                continue;
            };
            let line_number = index + 1;
            match first_seen.get(key) {
                Some(&first_line) => duplicates.push(DuplicateKey {
                    key: key.to_string(),
                    line: line_number,
                    first_line,
                }),
                None => {
                    first_seen.insert(key, line_number);
                }
            }
        }

        duplicates
    }

    /// Decode `packinfo.yml`. Keys are matched case-insensitively.
    pub fn parse_packinfo(&self, raw_text: &str) -> Option<PackInfo> {
        let value = match load_last_wins(raw_text) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Ignoring unreadable packinfo: {}", err);
                return None;
            }
        };
        let record = CiRecord::from_value(&value)?;
        Some(PackInfo {
            name: record.get_string("Name"),
            version: record.get_string("Version"),
            author: record.get_string("Author"),
            icon: record.get_string("Icon"),
            description: record.get_string("Description"),
        })
    }

    fn syntax_error(&self, err: &serde_yaml_ng::Error, text: &str) -> ParseIssue {
        let mut issue = ParseIssue::new(
            ParseIssueKind::YamlParseError,
            humanize_message(&err.to_string()),
        );
        if let Some(location) = err.location() {
            issue.line = Some(location.line());
            issue.column = Some(location.column());
            issue.snippet = source_snippet(text, location.line());
        }
        issue
    }
}

impl Default for YamlFileParser {
    fn default() -> Self {
        Self::new()
    }
}
