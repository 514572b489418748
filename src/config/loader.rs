use std::fs;
use std::path::{Path, PathBuf};

use super::core::ObjcmetaConfig;
use crate::errors::ExtractError;

pub const CONFIG_FILE_NAME: &str = ".objcmeta.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Contents written by `objcmeta init`.
pub const DEFAULT_CONFIG: &str = r#"# objcmeta configuration

[scan]
# File extensions treated as header units
extensions = ["h"]
# Glob patterns for paths to skip
ignore = []

[encoding]
# Class-name prefixes treated as object types, in addition to NS and UI
object_prefixes = []

# Extra struct layouts, keyed by type spelling
[encoding.structs]
# MyPoint = "{MyPoint=dd}"

# Literal encodings by selector; prefix with - or + to restrict direction
[encoding.overrides]
# "+sharedInstance" = "@16@0:8"

[output]
# plist or json
format = "plist"
# path or name
sort = "path"
version = "1.2050000429153442"
"#;

/// Pure function to parse config from a TOML string
pub fn parse_config(contents: &str) -> Result<ObjcmetaConfig, String> {
    let config = toml::from_str::<ObjcmetaConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    // Tables are built once here so a bad entry is reported at load time
    config.encoding_tables().map_err(|e| e.to_string())?;

    Ok(config)
}

/// Load an explicitly named config file. Unlike discovery, failures are errors.
pub fn load_config_from(path: &Path) -> Result<ObjcmetaConfig, ExtractError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ExtractError::config_with_path(e.to_string(), path))?;
    let config =
        parse_config(&contents).map_err(|message| ExtractError::config_with_path(message, path))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<ObjcmetaConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} in {}. Using defaults.", e, config_path.display());
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.objcmeta.toml`, falling back to defaults.
///
/// The nearest file wins even when it is unusable; ancestors are not consulted.
pub fn load_config(start: &Path) -> ObjcmetaConfig {
    let nearest = directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file());

    let Some(path) = nearest else {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        return ObjcmetaConfig::default();
    };
    try_load_config_from_path(&path).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortKey;
    use crate::io::writers::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_text_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.scan.extensions, vec!["h"]);
        assert_eq!(config.output.format, OutputFormat::Plist);
        assert_eq!(config.output.sort, SortKey::Path);
    }

    #[test]
    fn test_parse_error_mentions_file_name() {
        let err = parse_config("[output\nsort = 1").unwrap_err();
        assert!(err.contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_bad_table_entry_is_a_parse_error() {
        let err = parse_config("[encoding.overrides]\n\"a b\" = \"v16@0:8\"\n").unwrap_err();
        assert!(err.contains("a b"));
    }

    #[test]
    fn test_directory_ancestors_limit() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_load_config_finds_ancestor_file() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("Headers/Private");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[output]\nsort = \"name\"\n",
        )
        .unwrap();

        let config = load_config(&nested);
        assert_eq!(config.output.sort, SortKey::Name);
    }

    #[test]
    fn test_invalid_discovered_config_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();

        let config = load_config(root.path());
        assert_eq!(config.output.sort, SortKey::Path);
    }

    #[test]
    fn test_invalid_nearest_config_does_not_fall_through_to_ancestor() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("Headers");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[output]\nsort = \"name\"\n",
        )
        .unwrap();
        fs::write(nested.join(CONFIG_FILE_NAME), "not = [valid").unwrap();

        let config = load_config(&nested);
        assert_eq!(config.output.sort, SortKey::Path);
    }

    #[test]
    fn test_explicit_config_errors_are_reported() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("custom.toml");
        fs::write(&path, "[output]\nformat = \"xml\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Config { .. }));
        assert_eq!(err.path(), Some(&path));

        let missing = load_config_from(&root.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ExtractError::Config { .. }));
    }
}
