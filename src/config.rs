//! Configuration management for blockmove
//!
//! Settings live in ~/.blockmove/config.toml unless another path is given.
//! The two saved patterns are read through a `ConfigStore` so every run can be
//! handed its own store.

use crate::error::{MoveError, Result};
use crate::relocator::InsertAnchor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_HEADER: &str = "# blockmove configuration file
# Edit with 'blockmove set-source' / 'blockmove set-destination' or by hand.
#
# [patterns]
# sourceRegex = \"/* start block */ ... /* end block */\"
# destinationRegex = \"insert_here\"
#
# [processing]
# insert_anchor = \"after\"    # \"after\" or \"before\" the destination match
# report_skipped = true        # notify about every skipped file
#
# [logging]
# debug = false                # write a debug log to ~/.blockmove/blockmove.log

";

/// blockmove configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Saved default patterns
    #[serde(default)]
    pub patterns: PatternsConfig,

    /// Processing settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternsConfig {
    #[serde(
        rename = "sourceRegex",
        alias = "sourceRegexOrSearchParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_regex: Option<String>,

    #[serde(
        rename = "destinationRegex",
        alias = "destinationRegexOrSearchParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub destination_regex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Insert the moved block after or before the destination match
    #[serde(default)]
    pub insert_anchor: InsertAnchor,

    /// Notify about each skipped file instead of only logging it
    #[serde(default = "default_report_skipped")]
    pub report_skipped: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            insert_anchor: InsertAnchor::After,
            report_skipped: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub debug: bool,
}

fn default_report_skipped() -> bool {
    true
}

/// The two saved pattern settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    SourceRegex,
    DestinationRegex,
}

impl SettingKey {
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::SourceRegex => "sourceRegex",
            SettingKey::DestinationRegex => "destinationRegex",
        }
    }
}

/// Get/set access to the saved patterns
pub trait ConfigStore {
    fn get(&self, key: SettingKey) -> Option<String>;
    fn set(&mut self, key: SettingKey, value: &str) -> Result<()>;
}

/// Store backed by a TOML file; writes go straight to disk
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    config: Config,
}

impl FileConfigStore {
    /// Open the store at the default location
    pub fn open_default() -> Result<Self> {
        Self::open(config_file_path()?)
    }

    /// Open the store at `path`; a missing file yields defaults
    pub fn open(path: PathBuf) -> Result<Self> {
        let config = load_config(&path)?;
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: SettingKey) -> Option<String> {
        self.config.get(key)
    }

    fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        self.config.set(key, value);
        save_config(&self.path, &self.config)
    }
}

/// In-memory store, used for isolated runs
#[derive(Debug, Default, Clone)]
pub struct MemoryConfigStore {
    values: HashMap<SettingKey, String>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: SettingKey, value: &str) -> Self {
        self.values.insert(key, value.to_string());
        self
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: SettingKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        self.values.insert(key, value.to_string());
        Ok(())
    }
}

impl Config {
    pub fn get(&self, key: SettingKey) -> Option<String> {
        let value = match key {
            SettingKey::SourceRegex => &self.patterns.source_regex,
            SettingKey::DestinationRegex => &self.patterns.destination_regex,
        };
        value.clone().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: SettingKey, value: &str) {
        let slot = match key {
            SettingKey::SourceRegex => &mut self.patterns.source_regex,
            SettingKey::DestinationRegex => &mut self.patterns.destination_regex,
        };
        *slot = Some(value.to_string());
    }
}

/// Get the configuration file path
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory holding the configuration and debug log
pub fn config_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| MoveError::Config("Cannot determine home directory".to_string()))?;
    Ok(home_dir.join(".blockmove"))
}

/// Load configuration from `path`, falling back to defaults when it doesn't exist
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(path).map_err(|e| {
        MoveError::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|e| {
        MoveError::Config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Save configuration to `path`, creating its directory if needed
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            MoveError::Config(format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let body = toml::to_string_pretty(config)
        .map_err(|e| MoveError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, format!("{}{}", DEFAULT_CONFIG_HEADER, body)).map_err(|e| {
        MoveError::Config(format!(
            "Failed to write config file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    for key in [SettingKey::SourceRegex, SettingKey::DestinationRegex] {
        let raw = match key {
            SettingKey::SourceRegex => &config.patterns.source_regex,
            SettingKey::DestinationRegex => &config.patterns.destination_regex,
        };
        if let Some(value) = raw {
            if value.contains('\0') {
                return Err(MoveError::Config(format!(
                    "Invalid {}: contains a NUL byte",
                    key.name()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.patterns.source_regex, None);
        assert_eq!(config.processing.insert_anchor, InsertAnchor::After);
        assert!(config.processing.report_skipped);
        assert!(!config.logging.debug);
    }

    #[test]
    fn test_parse_with_aliases() {
        let config: Config = toml::from_str(
            r#"
[patterns]
sourceRegexOrSearchParameters = "a ... b"
destinationRegex = "here"

[processing]
insert_anchor = "before"
"#,
        )
        .unwrap();
        assert_eq!(config.get(SettingKey::SourceRegex).as_deref(), Some("a ... b"));
        assert_eq!(config.get(SettingKey::DestinationRegex).as_deref(), Some("here"));
        assert_eq!(config.processing.insert_anchor, InsertAnchor::Before);
        assert!(config.processing.report_skipped);
    }

    #[test]
    fn test_invalid_anchor_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[processing]\ninsert_anchor = \"sideways\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(MoveError::Config(_))));
    }

    #[test]
    fn test_nul_in_pattern_is_rejected() {
        let mut config = Config::default();
        config.set(SettingKey::DestinationRegex, "bad\0value");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("destinationRegex"));
    }

    #[test]
    fn test_empty_value_reads_as_unset() {
        let mut config = Config::default();
        config.set(SettingKey::SourceRegex, "");
        assert_eq!(config.get(SettingKey::SourceRegex), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut store = FileConfigStore::open(path.clone()).unwrap();
        assert_eq!(store.get(SettingKey::SourceRegex), None);
        store.set(SettingKey::SourceRegex, "/* a */ ... /* b */").unwrap();
        store.set(SettingKey::DestinationRegex, "insert_here").unwrap();

        let reopened = FileConfigStore::open(path).unwrap();
        assert_eq!(
            reopened.get(SettingKey::SourceRegex).as_deref(),
            Some("/* a */ ... /* b */")
        );
        assert_eq!(
            reopened.get(SettingKey::DestinationRegex).as_deref(),
            Some("insert_here")
        );
    }

    #[test]
    fn test_memory_stores_are_isolated() {
        let mut first = MemoryConfigStore::new();
        let second = MemoryConfigStore::new();
        first.set(SettingKey::DestinationRegex, "x").unwrap();
        assert_eq!(first.get(SettingKey::DestinationRegex).as_deref(), Some("x"));
        assert_eq!(second.get(SettingKey::DestinationRegex), None);
    }
}
