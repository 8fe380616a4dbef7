//! Error types for mwext-git

use thiserror::Error;

/// Result type alias using mwext-git's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Git facade error types
#[derive(Error, Debug)]
pub enum Error {
    /// A git command exited unsuccessfully
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    /// The repository has no remotes configured
    #[error("Git repository {path} has no remotes.")]
    NoRemotes { path: String },

    /// Several remotes exist and none is named origin
    #[error("Cannot determine origin for git repository {path}.")]
    AmbiguousRemote { path: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library error (executable resolution)
    #[error(transparent)]
    Core(#[from] mwext_core::Error),
}

impl Error {
    /// Create a git operation error
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    /// Create a no remotes error
    pub fn no_remotes(path: impl Into<String>) -> Self {
        Self::NoRemotes { path: path.into() }
    }

    /// Create an ambiguous remote error
    pub fn ambiguous_remote(path: impl Into<String>) -> Self {
        Self::AmbiguousRemote { path: path.into() }
    }

    /// Stable error code, when the failure has one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(e) => e.code(),
            _ => None,
        }
    }
}
