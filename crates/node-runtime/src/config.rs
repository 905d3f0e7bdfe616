//! # Node Configuration
//!
//! One explicit configuration object, loaded by the composition root and
//! passed down to constructors. No component reads global state.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use cc_event_sync::SyncConfig;
use cc_ledger_client::SubmissionConfig;

/// Full runtime configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Directory for the RocksDB mirror database.
    pub data_dir: String,
    /// Polling-loop knobs.
    pub sync: SyncConfig,
    /// Write-path knobs.
    pub submission: SubmissionConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data/custody-mirror".to_string(),
            sync: SyncConfig::default(),
            submission: SubmissionConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Loads a JSON config file; missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
