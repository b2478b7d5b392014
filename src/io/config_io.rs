use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::storage::atomic_write;
use crate::model::config::AppConfig;

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "tasklist.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse tasklist.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize tasklist.toml: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Default config file path, respecting XDG_CONFIG_HOME
pub fn default_config_path() -> PathBuf {
    xdg_dir(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
        ".config",
    )
    .join(CONFIG_FILE)
}

/// Default directory for saved todos, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    xdg_dir(
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
        ".local/share",
    )
}

/// `$XDG_*_HOME/tasklist`, falling back to `$HOME/<fallback>/tasklist`
fn xdg_dir(xdg: Option<String>, home: Option<String>, fallback: &str) -> PathBuf {
    let base = xdg
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            home.map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/"))
                .join(fallback)
        });
    base.join("tasklist")
}

/// Read the config file. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(toml::from_str(&text)?)
}

/// Write the config file, creating its directory if needed
pub fn write_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)?;
    let write_err = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    atomic_write(path, text.as_bytes()).map_err(write_err)
}
