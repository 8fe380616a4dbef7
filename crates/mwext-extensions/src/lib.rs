//! Extension management for mwext
//!
//! This crate handles:
//! - Install source detection (Composer, git-tag, git-master, git-rel)
//! - Update checks and fast-forward updates
//! - Switching an extension between install sources
//! - Batch inspection and updates across the extensions directory
//! - Clients for the extension metadata API and Packagist

pub mod api;
pub mod batch;
pub mod composer;
pub mod error;
pub mod local;
pub mod packagist;
pub mod sources;
pub mod types;

pub use api::{ApiClient, ExtensionApi};
pub use batch::{
    DownloadOutcome, Inspection, SwitchOutcome, UpdateOutcome, UpdateProgress,
    INSPECT_CONCURRENCY,
};
pub use composer::{Composer, PackageManager};
pub use error::{Error, Result, Service};
pub use local::{Extensions, LocalExtension};
pub use packagist::{PackageRegistry, PackagistClient};
pub use sources::{InstallSource, Services, SourceContext, SourceKind};
pub use types::{InfoLine, SourceData, Tone, UpdateInfo};
