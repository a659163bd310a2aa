use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Maximum replays one `run_pending_replays` call executes; `None` drains the queue.
    pub replay_batch_limit: Option<usize>,
    /// Report the first failure of a load to the failure sink.
    pub fire_failure_notifications: bool,
    /// Log a warning when an event arrives before its causal predecessor.
    pub warn_on_out_of_order: bool,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            replay_batch_limit: None,
            fire_failure_notifications: true,
            warn_on_out_of_order: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl TrackerSettings {
    /// Parses settings from RON text. Missing fields keep their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }
}
