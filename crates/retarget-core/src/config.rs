//! Configuration for retarget.
//!
//! Loads config from:
//! 1. Global: ~/.config/retarget/config.toml
//! 2. Per-project: .retarget/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [rules]
//! ignored_namespaces = ["Tests"]
//! ignored_classes = ["Benchmark"]
//!
//! [rules.static_redirects]
//! Settings = "GlobalSettings"
//!
//! [parse]
//! preprocessor_symbols = ["RELEASE"]
//!
//! [types]
//! decimal = "Decimal"
//!
//! [[known_classes]]
//! name = "StringBuilder"
//! target = "StringBuilder"
//! import = 'import { StringBuilder } from "./runtime";'
//! ```

use retarget_model::{KnownClass, KnownClasses, Rules, TypeMap};
use retarget_syntax::ParseOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for reading documents.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ParseConfig {
    /// Extra symbols defined on top of the target's own.
    pub preprocessor_symbols: Vec<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RetargetConfig {
    pub rules: Rules,
    pub parse: ParseConfig,
    /// Primitive overrides, merged over the target's table.
    pub types: TypeMap,
    pub known_classes: Vec<KnownClass>,
}

impl RetargetConfig {
    /// Load configuration for a project.
    ///
    /// Missing files are not an error; unreadable or malformed ones are.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path()
            && global_path.is_file()
        {
            config = config.merge(Self::load_file(&global_path)?);
        }

        let project_path = root.join(".retarget").join("config.toml");
        if project_path.is_file() {
            config = config.merge(Self::load_file(&project_path)?);
        }

        tracing::debug!(
            ignored_namespaces = config.rules.ignored_namespaces.len(),
            ignored_classes = config.rules.ignored_classes.len(),
            known_classes = config.known_classes.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Get the global config path.
    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(dirs::config_dir)?;
        Some(config_home.join("retarget").join("config.toml"))
    }

    /// Load config from a file path.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge another config into this one. Lists are unioned; on
    /// conflicting keys `other` wins.
    pub fn merge(self, other: Self) -> Self {
        let mut types = self.types;
        types.extend(&other.types);

        let mut preprocessor_symbols = self.parse.preprocessor_symbols;
        for symbol in other.parse.preprocessor_symbols {
            if !preprocessor_symbols.contains(&symbol) {
                preprocessor_symbols.push(symbol);
            }
        }

        let mut known_classes = self.known_classes;
        for class in other.known_classes {
            known_classes.retain(|c| !(c.name == class.name && c.arity == class.arity));
            known_classes.push(class);
        }

        Self {
            rules: self.rules.merge(other.rules),
            parse: ParseConfig {
                preprocessor_symbols,
            },
            types,
            known_classes,
        }
    }

    /// The target's primitive table with overrides applied.
    pub fn type_map(&self, target: TypeMap) -> TypeMap {
        let mut map = target;
        map.extend(&self.types);
        map
    }

    /// The target's known classes with configured entries registered on top.
    pub fn known(&self, target: KnownClasses) -> KnownClasses {
        let mut known = target;
        for class in &self.known_classes {
            known.register(class.clone());
        }
        known
    }

    /// Fold the target's symbols and configured ones into parse options.
    pub fn parse_options(&self, target_symbols: &[&str]) -> ParseOptions {
        let mut options = ParseOptions::new();
        for symbol in target_symbols {
            options.define(symbol);
        }
        for symbol in &self.parse.preprocessor_symbols {
            options.define(symbol);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_project_config(dir: &TempDir, contents: &str) {
        let config_dir = dir.path().join(".retarget");
        std::fs::create_dir_all(&config_dir).unwrap();
        let mut file = std::fs::File::create(config_dir.join("config.toml")).unwrap();
        write!(file, "{}", contents).unwrap();
    }

    #[test]
    fn load_file_reads_all_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[rules]
ignored_namespaces = ["Tests"]

[rules.static_redirects]
Settings = "GlobalSettings"

[parse]
preprocessor_symbols = ["RELEASE"]

[types]
decimal = "Decimal"

[[known_classes]]
name = "StringBuilder"
target = "StringBuilder"
import = 'import { StringBuilder } from "./runtime";'
"#,
        )
        .unwrap();

        let config = RetargetConfig::load_file(&path).unwrap();
        assert_eq!(config.rules.ignored_namespaces, vec!["Tests"]);
        assert_eq!(
            config.rules.static_redirects.get("Settings").map(String::as_str),
            Some("GlobalSettings")
        );
        assert_eq!(config.parse.preprocessor_symbols, vec!["RELEASE"]);
        assert_eq!(config.types.get("decimal"), Some("Decimal"));
        assert_eq!(config.known_classes.len(), 1);
        assert_eq!(
            config.known_classes[0].import.as_deref(),
            Some(r#"import { StringBuilder } from "./runtime";"#)
        );
    }

    #[test]
    fn project_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        write_project_config(&dir, "[rules]\nignored_classes = [\"Benchmark\"]\n");
        let config = RetargetConfig::load(dir.path()).unwrap();
        assert!(config.rules.ignores_class("PathBenchmark"));
    }

    #[test]
    fn missing_project_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = RetargetConfig::load(dir.path()).unwrap();
        assert!(config.known_classes.is_empty());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rules\n").unwrap();
        let err = RetargetConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn merge_unions_lists_and_overrides_keys() {
        let global: RetargetConfig = toml::from_str(
            r#"
[rules]
ignored_namespaces = ["Tests"]
[parse]
preprocessor_symbols = ["A"]
[types]
decimal = "number"
"#,
        )
        .unwrap();
        let project: RetargetConfig = toml::from_str(
            r#"
[rules]
ignored_namespaces = ["Tests", "Bench"]
[parse]
preprocessor_symbols = ["B"]
[types]
decimal = "Decimal"
"#,
        )
        .unwrap();

        let merged = global.merge(project);
        assert_eq!(merged.rules.ignored_namespaces, vec!["Tests", "Bench"]);
        assert_eq!(merged.parse.preprocessor_symbols, vec!["A", "B"]);
        assert_eq!(merged.types.get("decimal"), Some("Decimal"));
    }

    #[test]
    fn parse_options_fold_target_and_config_symbols() {
        let config = RetargetConfig {
            parse: ParseConfig {
                preprocessor_symbols: vec!["RELEASE".into()],
            },
            ..RetargetConfig::default()
        };
        let options = config.parse_options(&["TYPESCRIPT"]);
        assert!(options.is_defined("TYPESCRIPT"));
        assert!(options.is_defined("RELEASE"));
    }
}
