//! Persisted mwext configuration
//!
//! A small key-value store kept in `~/.mwext/config.yaml` (or the file named by
//! `MWEXT_CONFIG`). Only the keys in [`ConfigKey`] are accepted.

use crate::error::{Error, Result};
use crate::utils::get_home_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "MWEXT_CONFIG";

/// Default extension metadata API base URL
pub const DEFAULT_API_BASE: &str = "https://tools.wmflabs.org/extensionservice/api/";

/// Keys accepted by the configuration store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    PhpPath,
    GitPath,
    ComposerPath,
    ApiBase,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::PhpPath,
        ConfigKey::GitPath,
        ConfigKey::ComposerPath,
        ConfigKey::ApiBase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::PhpPath => "php-path",
            ConfigKey::GitPath => "git-path",
            ConfigKey::ComposerPath => "composer-path",
            ConfigKey::ApiBase => "api-base",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::unknown_config_key(s))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, flatten)]
    values: BTreeMap<String, String>,
}

/// Loaded configuration store
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl ConfigStore {
    /// Default config file location, honouring `MWEXT_CONFIG`
    pub fn default_path() -> anyhow::Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(get_home_dir()?.join(".mwext").join("config.yaml"))
    }

    /// Load the store from its default location
    pub fn load_default() -> anyhow::Result<Self> {
        let path = Self::default_path()?;
        Ok(Self::load(&path)?)
    }

    /// Load the store from `path`; a missing file yields an empty store
    pub fn load(path: &Path) -> Result<Self> {
        let values = match std::fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_yaml_ng::from_str::<ConfigFile>(&content)?.values,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(Error::Io(e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// In-memory store that is never read from disk
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.values.get(key.as_str()).map(String::as_str)
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.values.insert(key.as_str().to_string(), value.into());
    }

    pub fn reset(&mut self, key: ConfigKey) -> Option<String> {
        self.values.remove(key.as_str())
    }

    /// All known keys paired with their current value
    pub fn entries(&self) -> Vec<(ConfigKey, Option<&str>)> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| (key, self.get(key)))
            .collect()
    }

    /// Metadata API base URL, falling back to the public service
    pub fn api_base(&self) -> &str {
        self.get(ConfigKey::ApiBase).unwrap_or(DEFAULT_API_BASE)
    }

    /// Write the store back to disk, creating the parent directory if needed
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = ConfigFile {
            values: self.values.clone(),
        };
        std::fs::write(&self.path, serde_yaml_ng::to_string(&file)?)?;
        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}
