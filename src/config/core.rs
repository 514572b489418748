use crate::analyzers::objc::EncodingTables;
use crate::core::MethodKind;
use crate::errors::ExtractError;
use crate::io::writers::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of the document's `version` entry.
pub const DEFAULT_VERSION: &str = "1.2050000429153442";

/// Root configuration structure for objcmeta
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjcmetaConfig {
    /// Which files are units
    #[serde(default)]
    pub scan: ScanConfig,

    /// Additions to the encoding tables
    #[serde(default)]
    pub encoding: EncodingConfig,

    /// Document settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl ObjcmetaConfig {
    /// Encoding tables seeded with the defaults plus the configured entries.
    pub fn encoding_tables(&self) -> Result<EncodingTables, ExtractError> {
        self.encoding.build_tables()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions treated as units, without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns for paths to skip
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore: Vec::new(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["h".to_string()]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Extra class-name prefixes treated as object types
    #[serde(default)]
    pub object_prefixes: Vec<String>,

    /// Struct spelling to layout, e.g. `MyPoint = "{MyPoint=ff}"`
    #[serde(default)]
    pub structs: BTreeMap<String, String>,

    /// Selector to literal encoding. A leading `-` or `+` restricts the
    /// entry to instance or class methods.
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl EncodingConfig {
    pub fn build_tables(&self) -> Result<EncodingTables, ExtractError> {
        let mut tables = EncodingTables::default();

        for prefix in &self.object_prefixes {
            if prefix.trim().is_empty() {
                return Err(ExtractError::config("object prefixes must not be empty"));
            }
            tables = tables.with_object_prefix(prefix.trim());
        }

        for (name, layout) in &self.structs {
            if !layout.starts_with(['{', '^']) {
                return Err(ExtractError::config(format!(
                    "struct layout for '{name}' must start with '{{' or '^', got '{layout}'"
                )));
            }
            tables = tables.with_struct(name.trim(), layout.as_str());
        }

        for (key, encoding) in &self.overrides {
            let (kind, selector) = parse_override_key(key)?;
            if encoding.is_empty() {
                return Err(ExtractError::config(format!(
                    "override for '{key}' has an empty encoding"
                )));
            }
            tables = tables.with_override(kind, selector, encoding.as_str());
        }

        Ok(tables)
    }
}

fn parse_override_key(key: &str) -> Result<(Option<MethodKind>, &str), ExtractError> {
    let key = key.trim();
    let (kind, selector) = match key.chars().next().and_then(MethodKind::from_marker) {
        Some(kind) => (Some(kind), key[1..].trim_start()),
        None => (None, key),
    };

    if selector.is_empty() || !selector.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ':')
    {
        return Err(ExtractError::config(format!(
            "'{key}' is not a valid override selector"
        )));
    }

    Ok((kind, selector))
}

/// Order of records in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Walker order: lexicographic by unit path
    #[default]
    Path,
    /// Stable sort by owner name
    Name,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub sort: SortKey,

    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            sort: SortKey::default(),
            version: default_version(),
        }
    }
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ObjcmetaConfig::default();
        assert_eq!(config.scan.extensions, vec!["h"]);
        assert!(config.scan.ignore.is_empty());
        assert_eq!(config.output.format, OutputFormat::Plist);
        assert_eq!(config.output.sort, SortKey::Path);
        assert_eq!(config.output.version, DEFAULT_VERSION);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: ObjcmetaConfig = toml::from_str(
            r#"
            [output]
            sort = "name"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.sort, SortKey::Name);
        assert_eq!(config.output.version, DEFAULT_VERSION);
        assert_eq!(config.scan.extensions, vec!["h"]);
    }

    #[test]
    fn test_encoding_entries_extend_defaults() {
        let config: ObjcmetaConfig = toml::from_str(
            r#"
            [encoding]
            object_prefixes = ["AB"]

            [encoding.structs]
            ABVector = "{ABVector=ff}"

            [encoding.overrides]
            "+sharedClient" = "@16@0:8"
            "reset" = "v16@0:8"
            "#,
        )
        .unwrap();
        let tables = config.encoding_tables().unwrap();

        assert!(tables.has_object_prefix("ABClient"));
        assert!(tables.has_object_prefix("NSString"));
        assert_eq!(tables.struct_layout("ABVector"), Some("{ABVector=ff}"));
        assert_eq!(
            tables.struct_layout("CGRect"),
            Some("{CGRect={CGPoint=dd}{CGSize=dd}}")
        );
        assert_eq!(
            tables.override_for(MethodKind::Class, "sharedClient"),
            Some("@16@0:8")
        );
        assert_eq!(tables.override_for(MethodKind::Instance, "sharedClient"), None);
        assert_eq!(tables.override_for(MethodKind::Instance, "reset"), Some("v16@0:8"));
        assert_eq!(tables.override_for(MethodKind::Instance, "dealloc"), Some("v16@0:8"));
    }

    #[test]
    fn test_invalid_override_key_is_rejected() {
        let mut config = ObjcmetaConfig::default();
        config
            .encoding
            .overrides
            .insert("not a selector".into(), "v16@0:8".into());
        let err = config.encoding_tables().unwrap_err();
        assert!(matches!(err, ExtractError::Config { .. }));
    }

    #[test]
    fn test_invalid_struct_layout_is_rejected() {
        let mut config = ObjcmetaConfig::default();
        config.encoding.structs.insert("Bad".into(), "dd".into());
        assert!(config.encoding_tables().is_err());
    }

    #[test]
    fn test_override_key_directions() {
        assert_eq!(
            parse_override_key("-close").unwrap(),
            (Some(MethodKind::Instance), "close")
        );
        assert_eq!(
            parse_override_key("+ shared").unwrap(),
            (Some(MethodKind::Class), "shared")
        );
        assert_eq!(parse_override_key("set:with:").unwrap(), (None, "set:with:"));
        assert!(parse_override_key("+").is_err());
    }
}
