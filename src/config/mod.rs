//! # Configuration Management Module
//!
//! Loads, validates and writes the add-on's TOML configuration.
//!
//! ## Configuration Structure
//!
//! - [`StarterPackConfig`] - toggles, message templates, grant delay and the two item lists
//! - [`DebugConfig`] - debug logging toggles
//! - [`LoggingConfig`] - log level and optional log file
//! - [`StorageConfig`] - where durable player attributes live
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starterpack::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("starterpack.toml").await?;
//!     for warning in config.validate() {
//!         eprintln!("{}", warning);
//!     }
//!     println!("Enabled: {}", config.starter_pack.enabled);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [starter-pack]
//! enabled = true
//! broadcast = true
//! welcome-message = "&aWelcome to the server, &b{player}&a!"
//! broadcast-message = "&e{player} &7has joined the server for the first time!"
//!
//! [[starter-pack.items]]
//! material = "BREAD"
//! amount = 16
//!
//! [[starter-pack.equipment]]
//! material = "LEATHER_HELMET"
//! slot = "helmet"
//!
//! [debug]
//! enabled = false
//! log-all-joins = false
//! ```
//!
//! Item entries stay as raw TOML values here; the pack builder validates them
//! one at a time so a single bad entry never rejects the whole file.

use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use toml::Value;

use crate::pack::StarterPackError;

pub const DEFAULT_WELCOME_MESSAGE: &str = "&aWelcome to the server, &b{player}&a!";
pub const DEFAULT_BROADCAST_MESSAGE: &str =
    "&e{player} &7has joined the server for the first time!";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "starter-pack", default)]
    pub starter_pack: StarterPackConfig,
    #[serde(default)]
    pub debug: DebugConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StarterPackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Announce first-time joins to everyone online.
    #[serde(default = "default_true")]
    pub broadcast: bool,
    /// Sent to the player after a grant. `{player}` is replaced with their name.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    #[serde(default = "default_broadcast_message")]
    pub broadcast_message: String,
    /// Delay between the join event and the grant, so the session can settle.
    #[serde(default = "default_grant_delay_ms")]
    pub grant_delay_ms: u64,
    /// Inventory items, one table per entry.
    #[serde(default)]
    pub items: Vec<Value>,
    /// Items meant for armor and hand slots.
    #[serde(default)]
    pub equipment: Vec<Value>,
}

fn default_true() -> bool {
    true
}

fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.to_string()
}

fn default_broadcast_message() -> String {
    DEFAULT_BROADCAST_MESSAGE.to_string()
}

fn default_grant_delay_ms() -> u64 {
    1000 // 20 ticks
}

impl Default for StarterPackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            broadcast: true,
            welcome_message: default_welcome_message(),
            broadcast_message: default_broadcast_message(),
            grant_delay_ms: default_grant_delay_ms(),
            items: Vec::new(),
            equipment: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DebugConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Log every join, not only first-time ones.
    #[serde(default)]
    pub log_all_joins: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
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

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

impl StorageConfig {
    /// Directory of the sled attribute database.
    pub fn attributes_path(&self) -> std::path::PathBuf {
        Path::new(&self.data_dir).join("attributes")
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))
    }

    /// Blocking variant for the reload command, which runs on the host's
    /// main loop rather than inside a runtime.
    pub fn load_blocking(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, StarterPackError> {
        Ok(toml::from_str(content)?)
    }

    /// Create a default configuration file
    pub async fn create_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;
        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path.display(), e))?;
        Ok(())
    }

    /// Non-fatal problems worth logging at startup and after a reload.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.starter_pack.items.is_empty() {
            warnings.push(
                "No entries in 'starter-pack.items', no items will be given!".to_string(),
            );
        }
        if self.starter_pack.equipment.is_empty() {
            warnings.push(
                "No entries in 'starter-pack.equipment', players will not be equipped".to_string(),
            );
        }
        if self.starter_pack.grant_delay_ms == 0 {
            warnings.push(
                "'starter-pack.grant-delay-ms' is 0; grants will fire on the next tick".to_string(),
            );
        }
        if !self.starter_pack.welcome_message.contains("{player}") {
            warnings.push("'starter-pack.welcome-message' has no {player} token".to_string());
        }
        warnings
    }
}

fn item(material: &str, extra: &[(&str, Value)]) -> Value {
    let mut table = toml::map::Map::new();
    table.insert("material".to_string(), Value::String(material.to_string()));
    for (key, value) in extra {
        table.insert(key.to_string(), value.clone());
    }
    Value::Table(table)
}

impl Default for Config {
    fn default() -> Self {
        let text = |s: &str| Value::String(s.to_string());
        let starter_pack = StarterPackConfig {
            items: vec![
                item("BREAD", &[("amount", Value::Integer(16))]),
                item("TORCH", &[("amount", Value::Integer(16))]),
                item("OAK_LOG", &[("amount", Value::Integer(8))]),
                item(
                    "MAP",
                    &[
                        ("name", text("&6Starter Map")),
                        ("lore", Value::Array(vec![text("&7Find your way home")])),
                    ],
                ),
            ],
            equipment: vec![
                item("LEATHER_HELMET", &[("slot", text("helmet"))]),
                item("LEATHER_CHESTPLATE", &[("slot", text("chestplate"))]),
                item("LEATHER_LEGGINGS", &[("slot", text("leggings"))]),
                item("LEATHER_BOOTS", &[("slot", text("boots"))]),
                item(
                    "STONE_SWORD",
                    &[
                        ("slot", text("mainhand")),
                        ("name", text("&bStarter Sword")),
                        ("enchantments", {
                            let mut ench = toml::map::Map::new();
                            ench.insert("unbreaking".to_string(), Value::Integer(1));
                            Value::Table(ench)
                        }),
                    ],
                ),
                item("STONE_PICKAXE", &[]),
            ],
            ..StarterPackConfig::default()
        };

        Config {
            starter_pack,
            debug: DebugConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("starterpack.log".to_string()),
            },
            storage: StorageConfig::default(),
        }
    }
}
