//! Operations across one or more installed extensions
//!
//! Inspection runs a bounded number of extensions concurrently. Updates run
//! strictly one at a time since git and Composer stream their output straight
//! to the terminal.

use crate::api::ExtensionApi;
use crate::error::{Error, Result};
use crate::local::{Extensions, LocalExtension};
use crate::sources::{InstallSource, SourceKind};
use crate::types::UpdateInfo;
use futures::stream::{self, StreamExt, TryStreamExt};
use mwext_core::RemoteExtension;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Maximum number of extensions inspected at the same time
pub const INSPECT_CONCURRENCY: usize = 5;

/// Detected source and pending update of one extension
#[derive(Debug, Clone)]
pub struct Inspection {
    pub name: String,
    /// `None` when no install source recognizes the directory
    pub source: Option<InstallSource>,
    /// `None` when up to date or when updates were not checked
    pub update: Option<UpdateInfo>,
}

/// Detect the source of each named extension, optionally checking for updates
///
/// Results are returned in the order of `names`.
pub async fn inspect(
    extensions: &Extensions,
    names: &[String],
    check_updates: bool,
) -> Result<Vec<Inspection>> {
    stream::iter(names)
        .map(|name| inspect_one(extensions, name, check_updates))
        .buffered(INSPECT_CONCURRENCY)
        .try_collect()
        .await
}

async fn inspect_one(
    extensions: &Extensions,
    name: &str,
    check_updates: bool,
) -> Result<Inspection> {
    let local = extensions.resolve(name).await?;
    let source = local.detect_source().await?;

    let update = match &source {
        Some(source) if check_updates => source.check_for_update().await?,
        _ => None,
    };

    Ok(Inspection {
        name: name.to_string(),
        source,
        update,
    })
}

/// Progress reported while updating
#[derive(Debug, Clone, Copy)]
pub enum UpdateProgress<'a> {
    /// About to update `name` through `source`
    Started { name: &'a str, source: SourceKind },
    /// `name` has no recognizable install source
    Skipped { name: &'a str },
}

/// Outcome for one extension of an update run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { name: String, source: SourceKind },
    Skipped { name: String },
}

/// Update each named extension in turn
///
/// The first failure aborts the run; extensions already updated stay updated.
pub async fn update<F>(
    extensions: &Extensions,
    names: &[String],
    mut progress: F,
) -> Result<Vec<UpdateOutcome>>
where
    F: FnMut(UpdateProgress<'_>),
{
    let mut outcomes = Vec::with_capacity(names.len());

    for name in names {
        let local = extensions.resolve(name).await?;
        let Some(source) = local.detect_source().await? else {
            warn!("No install source detected for {}, skipping", name);
            progress(UpdateProgress::Skipped { name });
            outcomes.push(UpdateOutcome::Skipped { name: name.clone() });
            continue;
        };

        progress(UpdateProgress::Started {
            name,
            source: source.kind(),
        });
        info!("Updating {} ({})", name, source.kind());
        source.apply_update().await?;

        outcomes.push(UpdateOutcome::Updated {
            name: name.clone(),
            source: source.kind(),
        });
    }

    Ok(outcomes)
}

/// Result of downloading an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub source: SourceKind,
    /// Where a previously installed copy was moved, when it was relocated
    pub archived: Option<PathBuf>,
}

/// Pick the install source to download through
///
/// A preferred source must be advertised; otherwise the first advertised
/// source this build knows is used.
pub fn choose_source(remote: &RemoteExtension, preferred: Option<SourceKind>) -> Result<SourceKind> {
    match preferred {
        Some(kind) if remote.supports(kind.name()) => Ok(kind),
        Some(kind) => Err(Error::incompatible_source(&remote.name, kind.name())),
        None => remote
            .sources
            .iter()
            .find_map(|name| SourceKind::from_name(name))
            .ok_or_else(|| Error::NoSupportedSource {
                name: remote.name.clone(),
            }),
    }
}

/// Download an extension that is not installed yet
///
/// With `force`, an existing copy is removed first (through Composer when it
/// was installed that way, otherwise by relocation).
pub async fn download(
    extensions: &Extensions,
    api: &dyn ExtensionApi,
    name: &str,
    preferred: Option<SourceKind>,
    force: bool,
) -> Result<DownloadOutcome> {
    let local = extensions.create(name);
    let present = local.exists().await;
    if present && !force {
        return Err(Error::installed(name));
    }

    let remote = api.get_extension(name).await?;
    let kind = choose_source(&remote, preferred)?;

    let archived = if present {
        let current = local.detect_source().await?;
        clear_existing(&local, current.as_ref()).await?
    } else {
        None
    };

    info!("Downloading {} from {}", name, kind);
    local.source_for(kind).download(&remote).await?;

    Ok(DownloadOutcome {
        source: kind,
        archived,
    })
}

/// Result of switching an extension to another install source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Migrated in place
    Switched,
    /// The existing copy was removed and downloaded again
    Replaced {
        /// Relocation path of the old copy; `None` when Composer removed it
        archived: Option<PathBuf>,
    },
}

/// Switch an installed extension to the `target` source
///
/// Fails `SAME_SOURCE` when `target` is already in use and
/// `INCOMPATIBLE_SOURCE` when `remote` does not advertise it. When the target
/// cannot migrate in place, `force` removes the existing copy and downloads
/// it again instead of failing `UNSUPPORTED_SWITCH`.
pub async fn switch(
    local: &LocalExtension,
    remote: &RemoteExtension,
    target: SourceKind,
    force: bool,
) -> Result<SwitchOutcome> {
    let current = local.detect_source().await?;

    if current.as_ref().map(InstallSource::kind) == Some(target) {
        return Err(Error::same_source(local.name(), target.name()));
    }
    if !remote.supports(target.name()) {
        return Err(Error::incompatible_source(local.name(), target.name()));
    }

    let attempt = match &current {
        Some(previous) => {
            debug!("Switching {} from {} to {}", local.name(), previous.kind(), target);
            local.source_for(target).switch_from(previous.kind()).await
        }
        None => Err(Error::unsupported_switch("an unknown source", target.name())),
    };

    match attempt {
        Ok(()) => Ok(SwitchOutcome::Switched),
        Err(e) if force && e.is_unsupported_switch() => {
            warn!("{}; replacing {} instead", e, local.name());
            let archived = clear_existing(local, current.as_ref()).await?;
            local.source_for(target).download(remote).await?;
            Ok(SwitchOutcome::Replaced { archived })
        }
        Err(e) => Err(e),
    }
}

/// Remove an installed copy through its source, or relocate it
async fn clear_existing(
    local: &LocalExtension,
    current: Option<&InstallSource>,
) -> Result<Option<PathBuf>> {
    if let Some(source) = current {
        if source.remove().await? {
            return Ok(None);
        }
    }
    local.relocate().await.map(Some)
}
