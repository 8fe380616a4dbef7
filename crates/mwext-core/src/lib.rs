//! # mwext-core
//!
//! Core library for the mwext CLI providing:
//! - Host root (MediaWiki install path) resolution and version detection
//! - Persisted configuration store (`~/.mwext/config.yaml`)
//! - External executable lookup with process-wide memoization
//! - Shared types for remote extension records and release pairs

pub mod config;
pub mod error;
pub mod host;
pub mod tools;
pub mod types;
pub mod utils;

pub use config::{ConfigKey, ConfigStore};
pub use error::{Error, Result};
pub use host::{HostRoot, HostVersion};
pub use tools::{ExecutablePrompt, Tool, ToolResolver};
pub use types::{Release, RemoteExtension};
pub use utils::get_home_dir;
