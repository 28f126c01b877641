use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::buttons::{LabelStyle, StandardCatalog};
use crate::sync::{HttpStore, JsonFileStore, Store};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub web: WebConfig,
    pub buttons: ButtonsConfig,
    pub pins: PinsConfig,
}

impl Config {
    /// Load configuration from the default location or create it
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/led-config-editor/config.toml"))
    }

    /// Build the configured store. Relative file paths resolve against
    /// `base_dir` (normally the directory holding the config file).
    pub fn build_store(&self, base_dir: &Path) -> Result<Store> {
        match self.store.kind {
            StoreKind::File => {
                let path = if self.store.path.is_absolute() {
                    self.store.path.clone()
                } else {
                    base_dir.join(&self.store.path)
                };
                Ok(Store::File(JsonFileStore::new(path)))
            }
            StoreKind::Http => {
                if self.store.endpoint.trim().is_empty() {
                    bail!("store.endpoint must be set when store.kind = \"http\"");
                }
                Ok(Store::Http(HttpStore::new(self.store.endpoint.clone())))
            }
        }
    }

    pub fn catalog(&self) -> StandardCatalog {
        StandardCatalog::new(self.buttons.label_style, self.buttons.swap_tp_share_labels)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// JSON record file, used when kind = "file"
    pub path: PathBuf,
    /// Base URL of the controller web API, used when kind = "http"
    pub endpoint: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::File,
            path: PathBuf::from("led-options.json"),
            endpoint: "http://192.168.7.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Port for the editor API
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self { port: 8088 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonsConfig {
    pub label_style: LabelStyle,
    /// Swap the Share and Touchpad labels in PS4 style
    pub swap_tp_share_labels: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinsConfig {
    /// GPIO pins treated as claimed by something outside the LED config
    pub reserved: Vec<i32>,
}
