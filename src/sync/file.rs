//! LED options stored as a JSON file on disk

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::LedOptionsStore;
use crate::error::Result;
use crate::model::LedOptionsRecord;
use crate::pins::UsedPins;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedOptionsStore for JsonFileStore {
    /// A missing file yields the default record
    async fn load(&self) -> Result<LedOptionsRecord> {
        if !fs::try_exists(&self.path).await? {
            info!("No LED options at {:?}, starting from defaults", self.path);
            return Ok(LedOptionsRecord::default());
        }

        let content = fs::read_to_string(&self.path).await?;
        let record = serde_json::from_str(&content)?;
        debug!("Read LED options from {:?}", self.path);
        Ok(record)
    }

    /// Written to a temporary file and renamed over the old one
    async fn save(&self, record: &LedOptionsRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(record)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!("Wrote LED options to {:?}", self.path);
        Ok(())
    }

    /// A standalone file knows nothing about other pin assignments
    async fn used_pins(&self) -> Result<UsedPins> {
        Ok(UsedPins::new())
    }
}
