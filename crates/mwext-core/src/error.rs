//! Error types for mwext-core

use thiserror::Error;

/// Result type alias using mwext-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for mwext
#[derive(Error, Debug)]
pub enum Error {
    /// No MediaWiki install could be located
    #[error("Could not find MediaWiki install path from CWD or MW_INSTALL_PATH.")]
    NotInInstallPath,

    /// The install's declared version could not be parsed
    #[error("Could not detect MediaWiki version.")]
    NoVersion,

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Unknown configuration key
    #[error("{key} is not a valid config key")]
    UnknownConfigKey { key: String },

    /// An executable could not be found or is not usable
    #[error("Could not find a usable {tool} executable: {reason}")]
    ExecutableNotFound { tool: String, reason: String },

    /// The user declined to provide an executable path
    #[error("A path to {tool} is required to continue")]
    ExecutableDeclined { tool: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an unknown config key error
    pub fn unknown_config_key(key: impl Into<String>) -> Self {
        Self::UnknownConfigKey { key: key.into() }
    }

    /// Create an executable not found error
    pub fn executable_not_found(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create an executable declined error
    pub fn executable_declined(tool: impl Into<String>) -> Self {
        Self::ExecutableDeclined { tool: tool.into() }
    }

    /// Stable error code for the failures users are expected to hit
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::NotInInstallPath => Some("NOT_IN_MW_IP"),
            Self::NoVersion => Some("NO_VERSION"),
            Self::UnknownConfigKey { .. } => Some("UNKNOWN_CONFIG_KEY"),
            Self::ExecutableNotFound { .. } => Some("EXECUTABLE_NOT_FOUND"),
            Self::ExecutableDeclined { .. } => Some("EXECUTABLE_DECLINED"),
            _ => None,
        }
    }
}
