//! Error types for mwext-extensions

use std::fmt;
use thiserror::Error;

/// Result type alias using mwext-extensions's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Remote services the extension manager talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Extension metadata API
    Api,
    /// Packagist package registry
    Packagist,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Api => write!(f, "the API"),
            Service::Packagist => write!(f, "Packagist"),
        }
    }
}

/// Extension management error types
#[derive(Error, Debug)]
pub enum Error {
    /// The extension directory is missing
    #[error("{path} does not exist or is not a directory")]
    ExtensionNotInstalled { path: String },

    /// Download requested for an extension that is already present
    #[error("{name} is already installed.")]
    ExtensionInstalled { name: String },

    /// Switch requested to the source already in use
    #[error("{name} is already using a {channel} source.")]
    SameSource { name: String, channel: String },

    /// Switch requested to a source the remote record does not advertise
    #[error("{name} does not have a {channel} source.")]
    IncompatibleSource { name: String, channel: String },

    /// The target source cannot migrate from the current one in place
    #[error("Cannot safely switch from {from} to {to}")]
    UnsupportedSwitch { from: String, to: String },

    /// Unknown install source name
    #[error("Unknown install source: {channel}")]
    UnknownSource { channel: String },

    /// None of the advertised sources can be handled
    #[error("{name} does not advertise any supported install source")]
    NoSupportedSource { name: String },

    /// An operation needing detected source data ran on an undetected source
    #[error("The {channel} source for {path} has not been detected")]
    MissingSourceData { channel: String, path: String },

    /// A remote service could not be reached
    #[error("Could not connect to {service} at {target}.")]
    NoConnection { service: Service, target: String },

    /// A remote service answered with an error
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// No tag of the repository looks like a version
    #[error("No version tags found in {repository}")]
    NoVersionTags { repository: String },

    /// An external command exited unsuccessfully
    #[error("{command} failed with {status}")]
    CommandFailed { command: String, status: String },

    /// Moving an extension out of the way failed
    #[error("Failed to relocate {from} to {to}: {reason}")]
    Relocation {
        from: String,
        to: String,
        reason: String,
    },

    /// Core library error
    #[error(transparent)]
    Core(#[from] mwext_core::Error),

    /// Git facade error
    #[error(transparent)]
    Git(#[from] mwext_git::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an extension not installed error
    pub fn not_installed(path: impl Into<String>) -> Self {
        Self::ExtensionNotInstalled { path: path.into() }
    }

    /// Create an extension installed error
    pub fn installed(name: impl Into<String>) -> Self {
        Self::ExtensionInstalled { name: name.into() }
    }

    /// Create a same source error
    pub fn same_source(name: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::SameSource {
            name: name.into(),
            channel: channel.into(),
        }
    }

    /// Create an incompatible source error
    pub fn incompatible_source(name: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::IncompatibleSource {
            name: name.into(),
            channel: channel.into(),
        }
    }

    /// Create an unsupported switch error
    pub fn unsupported_switch(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::UnsupportedSwitch {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create an unknown source error
    pub fn unknown_source(channel: impl Into<String>) -> Self {
        Self::UnknownSource {
            channel: channel.into(),
        }
    }

    /// Create a missing source data error
    pub fn missing_source_data(channel: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingSourceData {
            channel: channel.into(),
            path: path.into(),
        }
    }

    /// Create a no connection error
    pub fn no_connection(service: Service, target: impl Into<String>) -> Self {
        Self::NoConnection {
            service,
            target: target.into(),
        }
    }

    /// Create a remote error
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, status: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            status: status.into(),
        }
    }

    /// Stable error code for the failures users are expected to hit
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::ExtensionNotInstalled { .. } => Some("EXT_NOT_INSTALLED"),
            Self::ExtensionInstalled { .. } => Some("EXT:INSTALLED"),
            Self::SameSource { .. } => Some("SAME_SOURCE"),
            Self::IncompatibleSource { .. } => Some("INCOMPATIBLE_SOURCE"),
            Self::UnsupportedSwitch { .. } => Some("UNSUPPORTED_SWITCH"),
            Self::UnknownSource { .. } => Some("UNKNOWN_SOURCE"),
            Self::NoSupportedSource { .. } => Some("NO_SUPPORTED_SOURCE"),
            Self::NoConnection {
                service: Service::Api,
                ..
            } => Some("API:NO_CONNECTION"),
            Self::NoConnection {
                service: Service::Packagist,
                ..
            } => Some("PACKAGIST:NO_CONNECTION"),
            Self::NoVersionTags { .. } => Some("NO_VERSION_TAGS"),
            Self::Core(e) => e.code(),
            Self::Git(e) => e.code(),
            _ => None,
        }
    }

    /// Whether a forced download can replace the extension after this error
    pub fn is_unsupported_switch(&self) -> bool {
        matches!(self, Self::UnsupportedSwitch { .. })
    }
}
