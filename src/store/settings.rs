//! JSON settings document: filter thresholds plus both blacklists

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::Result;
use crate::filter::{Blacklists, ThresholdSettings};

/// The persisted settings document, read at the start of every run
/// and written back after risk classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    #[serde(default)]
    pub filters: ThresholdSettings,
    #[serde(flatten)]
    pub blacklists: Blacklists,
}

impl RunSettings {
    /// Starter document written when none exists yet.
    pub fn bootstrap() -> Self {
        Self {
            filters: ThresholdSettings {
                min_price: Some(0.01),
                min_volume: Some(1000.0),
                max_change: Some(80.0),
            },
            blacklists: Blacklists::default(),
        }
    }
}

/// File-backed settings storage.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writes the bootstrap document unless the file already exists.
    pub async fn ensure_exists(&self) -> Result<()> {
        if !self.path.exists() {
            self.save(&RunSettings::bootstrap()).await?;
            info!(path = %self.path.display(), "settings file bootstrapped");
        }
        Ok(())
    }

    pub async fn load(&self) -> Result<RunSettings> {
        let data = tokio::fs::read_to_string(&self.path).await?;
        let settings: RunSettings = serde_json::from_str(&data)?;
        debug!(
            path = %self.path.display(),
            banned = settings.blacklists.len(),
            "settings loaded"
        );
        Ok(settings)
    }

    pub async fn save(&self, settings: &RunSettings) -> Result<()> {
        let data = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, data).await?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
