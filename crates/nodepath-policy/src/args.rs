//! Plugin arguments decoded from the host scheduler's configuration.
//!
//! ```json
//! {
//!   "storageConfig": {
//!     "configMapName": "local-path-config",
//!     "configMapNamespace": "kube-system",
//!     "configKey": "config.json"
//!   },
//!   "minRefreshIntervalSeconds": 0,
//!   "maxScore": 100
//! }
//! ```
//!
//! Every field is optional. Unset (or empty) storage fields fall back to
//! their defaults one by one.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};

/// Default name of the configuration document.
pub const DEFAULT_CONFIG_MAP_NAME: &str = "local-path-config";
/// Default namespace of the configuration document.
pub const DEFAULT_CONFIG_MAP_NAMESPACE: &str = "kube-system";
/// Default field key holding the configuration JSON.
pub const DEFAULT_CONFIG_KEY: &str = "config.json";

/// Where the configuration document lives, as supplied by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_key: Option<String>,
}

/// Arguments for [`PathPolicy`](crate::PathPolicy).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_config: Option<StorageConfig>,
    /// Skip the pre-filter refresh while the last successful one is
    /// younger than this. Unset or `0` refreshes on every pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_refresh_interval_seconds: Option<u64>,
    /// Clamp node scores to this value. Unset leaves them unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i64>,
}

/// Fully resolved document location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub namespace: String,
    pub name: String,
    pub key: String,
}

impl Default for ConfigSource {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_CONFIG_MAP_NAMESPACE.to_string(),
            name: DEFAULT_CONFIG_MAP_NAME.to_string(),
            key: DEFAULT_CONFIG_KEY.to_string(),
        }
    }
}

impl PolicyArgs {
    /// Decode host-supplied arguments. `None` yields all defaults.
    pub fn decode(raw: Option<&serde_json::Value>) -> PolicyResult<Self> {
        let args = match raw {
            None | Some(serde_json::Value::Null) => Self::default(),
            Some(value) => Self::deserialize(value)
                .map_err(|e| PolicyError::InvalidArgs(e.to_string()))?,
        };
        args.validate()?;
        Ok(args)
    }

    fn validate(&self) -> PolicyResult<()> {
        if let Some(max) = self.max_score.filter(|max| *max < 0) {
            return Err(PolicyError::InvalidArgs(format!(
                "maxScore must not be negative, got {max}"
            )));
        }
        Ok(())
    }

    /// Resolve the document location, filling unset fields with defaults.
    pub fn source(&self) -> ConfigSource {
        let defaults = ConfigSource::default();
        let Some(storage) = &self.storage_config else {
            return defaults;
        };
        ConfigSource {
            namespace: pick(&storage.config_map_namespace, defaults.namespace),
            name: pick(&storage.config_map_name, defaults.name),
            key: pick(&storage.config_key, defaults.key),
        }
    }

    /// Minimum age of the last refresh before pre-filter fetches again.
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.min_refresh_interval_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

fn pick(value: &Option<String>, default: String) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default,
    }
}
