//! Command implementations
//!
//! - info: Show the install source and update status of one extension
//! - list: List installed extensions with their install sources
//! - outdated: List extensions with pending updates
//! - download: Download extensions that are not installed yet
//! - update: Update installed extensions, one at a time
//! - switch: Move an extension to another install source
//! - config: Read and write the persisted configuration
//! - setup: Resolve the external tools up front

pub mod config;
pub mod download;
pub mod info;
pub mod list;
pub mod outdated;
pub mod setup;
pub mod switch;
pub mod update;

use anyhow::{Context, Result};
use mwext_core::{ConfigStore, HostRoot, ToolResolver};
use mwext_extensions::{ApiClient, Extensions, Services};
use std::sync::Arc;
use thiserror::Error;

use crate::prompt::TerminalPrompt;

/// Invalid combinations of otherwise valid arguments
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Extension names cannot be combined with --all")]
    NamesWithAll,
}

impl UsageError {
    pub fn code(&self) -> &'static str {
        match self {
            UsageError::NamesWithAll => "UNEXPECTED_ARG",
        }
    }
}

/// Taxonomy code of the first known failure in the error chain
pub fn error_code(e: &anyhow::Error) -> Option<&'static str> {
    e.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<mwext_extensions::Error>() {
            return e.code();
        }
        if let Some(e) = cause.downcast_ref::<mwext_core::Error>() {
            return e.code();
        }
        cause.downcast_ref::<UsageError>().map(UsageError::code)
    })
}

/// Load the configuration and install the process-wide tool resolver
pub(crate) fn load_config() -> Result<ConfigStore> {
    let config = ConfigStore::load_default().context("Failed to load configuration")?;
    ToolResolver::new()
        .with_config(config.clone())
        .with_prompt(TerminalPrompt)
        .install();
    Ok(config)
}

/// Everything a command needs to work on the current MediaWiki install
pub(crate) struct Session {
    pub config: ConfigStore,
    pub extensions: Extensions,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = load_config()?;
        let root = HostRoot::from_env()?;
        let services = Services::standard().context("Failed to initialize Packagist client")?;

        Ok(Self {
            config,
            extensions: Extensions::new(Arc::new(root), services),
        })
    }

    pub fn api(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.config).context("Failed to initialize API client")
    }
}
