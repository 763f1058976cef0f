//! Persisted configuration store for clusterlab
//!
//! A flat key/value JSON file holding the credentials that gate every
//! lifecycle verb (API token, software artifact location) plus one
//! `cluster.<prefix>` entry per created cluster, recording the topology
//! parameters so later verbs can regenerate the topology. Every mutation is
//! written through a temp file and an atomic rename, so a successful call is
//! durable even if the process dies right after.

pub mod error;
pub mod gate;

pub use error::{ConfigError, Result};
pub use gate::{GateError, GateRequirement, check_gate};

use clusterlab_core::TopologyParams;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key holding the API token.
pub const KEY_API_TOKEN: &str = "api-token";
/// Key holding the software artifact location.
pub const KEY_LOCATION: &str = "location";

const CLUSTER_KEY_PREFIX: &str = "cluster.";

/// Store key for a cluster's persisted topology parameters.
pub fn cluster_key(prefix: &str) -> String {
    format!("{}{}", CLUSTER_KEY_PREFIX, prefix)
}

/// In-memory view of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigRecord {
    values: BTreeMap<String, Value>,
}

impl ConfigRecord {
    /// The API token, if set to a non-empty string.
    pub fn api_token(&self) -> Option<&str> {
        self.get_str(KEY_API_TOKEN)
    }

    /// The software artifact location, if set to a non-empty string.
    pub fn location(&self) -> Option<&str> {
        self.get_str(KEY_LOCATION)
    }

    /// Topology parameters recorded by `create` for a hostname prefix.
    pub fn cluster(&self, prefix: &str) -> Option<TopologyParams> {
        let value = self.values.get(&cluster_key(prefix))?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Every recorded cluster, in stable (sorted) prefix order.
    pub fn clusters(&self) -> Vec<(String, TopologyParams)> {
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let prefix = key.strip_prefix(CLUSTER_KEY_PREFIX)?;
                let params = serde_json::from_value(value.clone()).ok()?;
                Some((prefix.to_string(), params))
            })
            .collect()
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key)?.as_str() {
            Some(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Handle on the on-disk configuration file.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Open the store at its default location
    /// (`~/.config/clusterlab/config.json`), creating the directory if
    /// needed. `CLUSTERLAB_CONFIG_PATH` overrides the path entirely.
    pub fn open() -> Result<Self> {
        if let Ok(path) = std::env::var("CLUSTERLAB_CONFIG_PATH") {
            return Ok(Self { path: PathBuf::from(path) });
        }

        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::ConfigDirNotFound)?
            .join("clusterlab");
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        Ok(Self {
            path: config_dir.join("config.json"),
        })
    }

    /// Open the store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current record. A missing file is an empty record, not an
    /// error; only an unreadable medium or corrupt content fails.
    pub fn load(&self) -> Result<ConfigRecord> {
        if !self.path.exists() {
            return Ok(ConfigRecord::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(ConfigRecord::default());
        }
        let values: BTreeMap<String, Value> = serde_json::from_str(&raw)?;
        Ok(ConfigRecord { values })
    }

    /// Upsert a single field and persist. Idempotent.
    pub fn set_field(&self, key: &str, value: Value) -> Result<()> {
        let mut record = self.load()?;
        record.values.insert(key.to_string(), value);
        self.persist(&record)
    }

    /// Remove a single field and persist. Removing an absent field is a
    /// no-op success.
    pub fn delete_field(&self, key: &str) -> Result<()> {
        let mut record = self.load()?;
        if record.values.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&record)
    }

    /// Write through a sibling temp file and rename, so the store never
    /// holds a half-written record.
    fn persist(&self, record: &ConfigRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(&record.values)?;
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
