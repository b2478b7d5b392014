use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration from tasklist.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted keys. Unset means the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Pretty-print the stored JSON
    #[serde(default)]
    pub pretty: bool,
}
