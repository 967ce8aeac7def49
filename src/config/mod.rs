//! Configuration management for the petri-dish bot.
//!
//! Configuration is TOML with three sections:
//!
//! - `[bot]` - bot name and the chat command word users address
//! - `[storage]` - data directory for the sled-backed dish store
//! - `[logging]` - log level and optional log file
//!
//! All values have defaults and are validated on load. `peiyangmin init`
//! writes a starter file.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name used in status output.
    pub name: String,
    /// First chat token that addresses the bot, e.g. `/培养皿 状态`.
    pub command_word: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "培养皿".to_string(),
            command_word: "培养皿".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/dishes".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of: error, warn, info, debug, trace.
    pub level: String,
    /// Optional log file; stdout is still used when it is a TTY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate a configuration file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("cannot read config {}: {}", path, e))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write a default configuration file.
    pub async fn create_default(path: &str) -> Result<Self> {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config)?;
        fs::write(path, serialized).await?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot.command_word.trim().is_empty() {
            return Err(anyhow!("bot.command_word must not be empty"));
        }
        if self.bot.command_word.split_whitespace().count() != 1 {
            return Err(anyhow!("bot.command_word must be a single token"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => return Err(anyhow!("logging.level '{}' is not a valid level", other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Config::default().validate().expect("defaults valid");
    }

    #[test]
    fn rejects_bad_command_word_and_level() {
        let mut config = Config::default();
        config.bot.command_word = "两个 词".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str("[storage]\ndata_dir = \"/tmp/dishes\"\n")
            .expect("parse");
        assert_eq!(config.storage.data_dir, "/tmp/dishes");
        assert_eq!(config.bot.command_word, "培养皿");
        assert_eq!(config.logging.level, "info");
    }
}
