use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with references that nothing in the import resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingReferencePolicy {
    /// Synthesize `_placeholders.yml` stubs.
    #[default]
    Placeholder,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    #[default]
    Skip,
    /// Abort the pack on the first file that failed to parse.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    #[default]
    Skip,
    Replace,
    /// Append `_imported` to the incoming entry's names.
    Rename,
}

/// Options that govern the merge step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    #[serde(default)]
    pub missing_references: MissingReferencePolicy,

    #[serde(default)]
    pub on_parse_errors: ParseErrorPolicy,

    /// Import entries that only carry warnings.
    #[serde(default = "default_on_warnings")]
    pub on_warnings: bool,

    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            missing_references: MissingReferencePolicy::default(),
            on_parse_errors: ParseErrorPolicy::default(),
            on_warnings: default_on_warnings(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

fn default_on_warnings() -> bool {
    true
}

macro_rules! impl_policy_str {
    ($ty:ty, $($variant:ident => $text:literal),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!("unknown value '{}'", other)),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($text),)+
                }
            }
        }
    };
}

impl_policy_str!(MissingReferencePolicy, Placeholder => "placeholder", Skip => "skip");
impl_policy_str!(ParseErrorPolicy, Skip => "skip", Stop => "stop");
impl_policy_str!(DuplicatePolicy, Skip => "skip", Replace => "replace", Rename => "rename");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_options_defaults() {
        let options = ImportOptions::default();
        assert_eq!(options.missing_references, MissingReferencePolicy::Placeholder);
        assert_eq!(options.on_parse_errors, ParseErrorPolicy::Skip);
        assert!(options.on_warnings);
        assert_eq!(options.duplicates, DuplicatePolicy::Skip);
    }

    #[test]
    fn test_policies_from_str() {
        assert_eq!("Rename".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Rename));
        assert_eq!("stop".parse::<ParseErrorPolicy>(), Ok(ParseErrorPolicy::Stop));
        assert!("merge".parse::<DuplicatePolicy>().is_err());
        assert_eq!(MissingReferencePolicy::Skip.to_string(), "skip");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let options: ImportOptions = serde_yaml_ng::from_str("duplicates: replace\n").unwrap();
        assert_eq!(options.duplicates, DuplicatePolicy::Replace);
        assert!(options.on_warnings);
    }
}
