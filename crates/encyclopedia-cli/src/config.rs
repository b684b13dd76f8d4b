//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use encyclopedia_core::Cardinality;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Default location of the config file
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("encyclopedia")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format when `--format` is not given
    pub format: OutputFormat,
    /// Cardinality of relations built by `relation` commands
    pub cardinality: Cardinality,
    /// Separates parent and child in `--edge` arguments
    pub edge_separator: String,
    /// Separates domain and range in `--pair` arguments
    pub pair_separator: String,
    /// Drop structurally duplicate trees after building a forest
    pub prune: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            cardinality: Cardinality::ManyToMany,
            edge_separator: ">".to_string(),
            pair_separator: "=".to_string(),
            prune: false,
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Every settable key
    pub fn keys() -> &'static [&'static str] {
        &["format", "cardinality", "edge_separator", "pair_separator", "prune"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "format" => Some(self.format.to_string()),
            "cardinality" => Some(self.cardinality.to_string()),
            "edge_separator" => Some(self.edge_separator.clone()),
            "pair_separator" => Some(self.pair_separator.clone()),
            "prune" => Some(self.prune.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "format" => self.format = value.parse()?,
            "cardinality" => self.cardinality = value.parse()?,
            "edge_separator" => self.edge_separator = separator(value)?,
            "pair_separator" => self.pair_separator = separator(value)?,
            "prune" => {
                self.prune = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got '{}'", value))?
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}

fn separator(value: &str) -> anyhow::Result<String> {
    if value.trim().is_empty() {
        anyhow::bail!("Separator must not be empty");
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("cardinality", "1:m").unwrap();
        config.set("prune", "true").unwrap();
        config.set("format", "json").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.get("cardinality").as_deref(), Some("1:M"));
        assert_eq!(loaded.get("format").as_deref(), Some("json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "edge_separator = \"->\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.edge_separator, "->");
        assert_eq!(config.pair_separator, "=");
    }

    #[test]
    fn test_set_validates() {
        let mut config = Config::default();
        assert!(config.set("cardinality", "2:3").is_err());
        assert!(config.set("prune", "maybe").is_err());
        assert!(config.set("edge_separator", " ").is_err());
        assert!(config.set("format", "xml").is_err());
        assert!(config.set("nope", "x").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_every_key_readable() {
        let config = Config::default();
        for key in Config::keys() {
            assert!(config.get(key).is_some(), "{}", key);
        }
    }
}
