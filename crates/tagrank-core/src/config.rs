//! Configuration for tagrank
//!
//! All settings live in a `tagrank.toml` file and are passed explicitly into
//! the entry points; there is no ambient global state. Missing fields fall
//! back to defaults so a partial file stays valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagrankError};
use crate::ranking::{FilterSet, DEFAULT_SCORE};

/// Default config file name, resolved relative to the working directory
pub const CONFIG_FILE: &str = "tagrank.toml";

/// Default database file name, resolved next to the config file
pub const DB_FILE: &str = "tagrank.db";

/// Default Hydrus client API endpoint
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:45869";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Hydrus client API
    pub api_url: String,
    /// Client API access key (empty means unset)
    pub access_key: String,
    /// Name of the destination page for ranked files
    pub page: String,
    /// Maximum number of files pushed per run
    pub limit: usize,
    /// Weight substituted for tags without an explicit one
    pub default_score: f64,
    /// Predicates excluded from every query (stored un-negated)
    pub blacklist: Vec<String>,
    /// Predicates appended unmodified to every query
    pub whitelist: Vec<String>,
    /// Override for the tag database path; defaults to a sibling of the config
    pub db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            access_key: String::new(),
            page: "tagrank".to_string(),
            limit: 1024,
            default_score: DEFAULT_SCORE,
            blacklist: Vec::new(),
            whitelist: vec!["system:inbox".to_string()],
            db_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TagrankError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                TagrankError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TagrankError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the tag database path relative to the config file location
    pub fn db_path(&self, config_path: &Path) -> PathBuf {
        match &self.db_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => config_dir(config_path).join(path),
            None => config_dir(config_path).join(DB_FILE),
        }
    }

    /// The constant filters applied to every query of a run
    pub fn filters(&self) -> FilterSet {
        FilterSet::new(self.blacklist.clone(), self.whitelist.clone())
    }
}

fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
