//! Install sources
//!
//! An install source is one of the fixed upstream channels an extension can
//! track. Every source supports the same operations:
//!
//! - `detect`: inspect the extension directory without mutating it
//! - `check_for_update`: compare the detected state against upstream
//! - `download`: install a fresh copy of an extension that is not present
//! - `apply_update`: move the installed copy to the newest state (fast-forward only)
//! - `switch_from`: migrate in place from another source's state
//!
//! [`InstallSource`] dispatches to the concrete source. Each carries its own
//! descriptor payload once detected; see [`SourceData`].

mod composer;
mod git_master;
mod git_rel;
mod git_tag;
pub mod registry;
pub mod version;

pub use composer::ComposerSource;
pub use git_master::GitMasterSource;
pub use git_rel::GitRelSource;
pub use git_tag::GitTagSource;
pub use registry::{release_branch, SourceKind, SOURCES, TRUNK_BRANCH, VCS_PREFIX};

use crate::composer::{Composer, PackageManager};
use crate::error::{Error, Result};
use crate::packagist::{PackageRegistry, PackagistClient};
use crate::types::{InfoLine, SourceData, UpdateInfo};
use mwext_core::utils::abbrev_rev;
use mwext_core::{HostRoot, RemoteExtension};
use mwext_git::GitRepo;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Package registry and package manager used by the Composer source
#[derive(Clone)]
pub struct Services {
    pub registry: Arc<dyn PackageRegistry>,
    pub packages: Arc<dyn PackageManager>,
}

impl Services {
    pub fn new(registry: Arc<dyn PackageRegistry>, packages: Arc<dyn PackageManager>) -> Self {
        Self { registry, packages }
    }

    /// Packagist and Composer through the process-wide tool resolver
    pub fn standard() -> Result<Self> {
        Ok(Self::new(
            Arc::new(PackagistClient::new()?),
            Arc::new(Composer::new()),
        ))
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Everything a source needs to operate on one extension directory
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub dir: PathBuf,
    pub git: GitRepo,
    pub root: Arc<HostRoot>,
    pub services: Services,
}

impl SourceContext {
    pub fn new(dir: impl Into<PathBuf>, root: Arc<HostRoot>, services: Services) -> Self {
        let dir = dir.into();
        Self {
            git: GitRepo::new(&dir),
            dir,
            root,
            services,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn missing_data(&self, kind: SourceKind) -> Error {
        Error::missing_source_data(kind.name(), self.dir.display().to_string())
    }
}

/// Repository URL of the remote record, required by the git sources
pub(crate) fn repository(remote: &RemoteExtension, kind: SourceKind) -> Result<&str> {
    remote
        .repository
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or_else(|| Error::incompatible_source(&remote.name, kind.name()))
}

/// Fail unless `previous` is a git based source
pub(crate) fn require_vcs(previous: SourceKind, target: SourceKind) -> Result<()> {
    if previous.is_vcs() {
        Ok(())
    } else {
        Err(Error::unsupported_switch(previous.name(), target.name()))
    }
}

/// An install source bound to one extension directory
#[derive(Debug, Clone)]
pub enum InstallSource {
    Composer(ComposerSource),
    GitTag(GitTagSource),
    GitMaster(GitMasterSource),
    GitRel(GitRelSource),
}

impl InstallSource {
    /// A source with no detected data, for download and switch
    pub fn new(kind: SourceKind, ctx: SourceContext) -> Self {
        match kind {
            SourceKind::Composer => Self::Composer(ComposerSource::new(ctx, None)),
            SourceKind::GitTag => Self::GitTag(GitTagSource::new(ctx, None)),
            SourceKind::GitMaster => Self::GitMaster(GitMasterSource::new(ctx, None)),
            SourceKind::GitRel => Self::GitRel(GitRelSource::new(ctx, None)),
        }
    }

    /// A source carrying previously detected data
    pub fn with_data(ctx: SourceContext, data: SourceData) -> Self {
        match data {
            SourceData::Composer(d) => Self::Composer(ComposerSource::new(ctx, Some(d))),
            SourceData::GitTag(d) => Self::GitTag(GitTagSource::new(ctx, Some(d))),
            SourceData::GitMaster(d) => Self::GitMaster(GitMasterSource::new(ctx, Some(d))),
            SourceData::GitRel(d) => Self::GitRel(GitRelSource::new(ctx, Some(d))),
        }
    }

    /// Probe each source in priority order, returning the first that matches
    pub async fn detect_any(ctx: &SourceContext) -> Result<Option<InstallSource>> {
        for kind in SOURCES {
            let source = InstallSource::new(kind, ctx.clone());
            match source.detect().await? {
                Some(data) => {
                    debug!("Source for {} is {} ({:?})", ctx.dir.display(), kind, data);
                    return Ok(Some(InstallSource::with_data(ctx.clone(), data)));
                }
                None => debug!("Source for {} is not {}", ctx.dir.display(), kind),
            }
        }
        Ok(None)
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Composer(_) => SourceKind::Composer,
            Self::GitTag(_) => SourceKind::GitTag,
            Self::GitMaster(_) => SourceKind::GitMaster,
            Self::GitRel(_) => SourceKind::GitRel,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Detected descriptor payload, if any
    pub fn data(&self) -> Option<SourceData> {
        match self {
            Self::Composer(s) => s.data().cloned().map(SourceData::Composer),
            Self::GitTag(s) => s.data().cloned().map(SourceData::GitTag),
            Self::GitMaster(s) => s.data().cloned().map(SourceData::GitMaster),
            Self::GitRel(s) => s.data().cloned().map(SourceData::GitRel),
        }
    }

    /// Inspect on-disk state; `None` when the extension does not track this source
    pub async fn detect(&self) -> Result<Option<SourceData>> {
        Ok(match self {
            Self::Composer(s) => s.detect().await?.map(SourceData::Composer),
            Self::GitTag(s) => s.detect().await?.map(SourceData::GitTag),
            Self::GitMaster(s) => s.detect().await?.map(SourceData::GitMaster),
            Self::GitRel(s) => s.detect().await?.map(SourceData::GitRel),
        })
    }

    /// Compare the installed state against upstream; `None` means up to date
    pub async fn check_for_update(&self) -> Result<Option<UpdateInfo>> {
        match self {
            Self::Composer(s) => s.check_for_update().await,
            Self::GitTag(s) => s.check_for_update().await,
            Self::GitMaster(s) => s.check_for_update().await,
            Self::GitRel(s) => s.check_for_update().await,
        }
    }

    /// Install a fresh copy from the remote record
    pub async fn download(&self, remote: &RemoteExtension) -> Result<()> {
        match self {
            Self::Composer(s) => s.download(remote).await,
            Self::GitTag(s) => s.download(remote).await,
            Self::GitMaster(s) => s.download(remote).await,
            Self::GitRel(s) => s.download(remote).await,
        }
    }

    /// Bring the installed copy to the newest state for this source
    pub async fn apply_update(&self) -> Result<()> {
        match self {
            Self::Composer(s) => s.apply_update().await,
            Self::GitTag(s) => s.apply_update().await,
            Self::GitMaster(s) => s.apply_update().await,
            Self::GitRel(s) => s.apply_update().await,
        }
    }

    /// Migrate in place from another source, failing `UNSUPPORTED_SWITCH` when unsafe
    pub async fn switch_from(&self, previous: SourceKind) -> Result<()> {
        match self {
            Self::Composer(s) => s.switch_from(previous).await,
            Self::GitTag(s) => s.switch_from(previous).await,
            Self::GitMaster(s) => s.switch_from(previous).await,
            Self::GitRel(s) => s.switch_from(previous).await,
        }
    }

    /// Uninstall through the source's own tooling
    ///
    /// Returns `false` when the source has no removal of its own and the
    /// directory should be relocated instead.
    pub async fn remove(&self) -> Result<bool> {
        match self {
            Self::Composer(s) => {
                s.remove().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Detailed status lines
    pub fn info_lines(&self) -> Vec<InfoLine> {
        match self.data() {
            Some(SourceData::Composer(d)) => {
                let mut lines = Vec::new();
                if !d.explicit {
                    lines.push(InfoLine::warning("Not explicitly installed"));
                }
                lines.push(InfoLine::pair("Installed version", d.version));
                lines
            }
            Some(SourceData::GitTag(d)) => vec![InfoLine::pair("Installed version", d.version)],
            Some(SourceData::GitMaster(d)) => vec![InfoLine::pair("Installed commit", d.rev)],
            Some(SourceData::GitRel(d)) => vec![
                InfoLine::pair("Release branch", d.branch),
                InfoLine::pair("Installed commit", d.rev),
            ],
            None => Vec::new(),
        }
    }

    /// One-line summary for listings
    pub fn list_info(&self) -> Option<String> {
        Some(match self.data()? {
            SourceData::Composer(d) => d.version,
            SourceData::GitTag(d) => d.version,
            SourceData::GitMaster(d) => abbrev(&d.rev).to_string(),
            SourceData::GitRel(d) => format!("{}; {}", d.branch, abbrev(&d.rev)),
        })
    }

    /// Update status lines
    pub fn update_lines(&self, update: Option<&UpdateInfo>) -> Vec<InfoLine> {
        match update {
            None => vec![InfoLine::no_updates()],
            Some(UpdateInfo::Version { version, count, .. }) => {
                let kind = match self.kind() {
                    SourceKind::Composer => "stable",
                    _ => "tagged",
                };
                vec![
                    InfoLine::pair("Updates available", format!("{} {} versions", count, kind)),
                    InfoLine::pair("Latest version", version),
                ]
            }
            Some(UpdateInfo::Revision { rev, count }) => vec![
                InfoLine::pair("Latest commit", rev),
                InfoLine::pair("Updates available", format!("{} revs", count)),
            ],
            Some(UpdateInfo::BranchSwitch { branch, .. }) => {
                vec![InfoLine::pair("New branch", branch)]
            }
        }
    }

    /// `old -> new` summary of an available update
    pub fn update_summary(&self, update: &UpdateInfo) -> String {
        let data = self.data();
        let current_rev = match &data {
            Some(SourceData::GitMaster(d)) => abbrev(&d.rev).to_string(),
            Some(SourceData::GitRel(d)) => abbrev(&d.rev).to_string(),
            _ => String::new(),
        };

        match update {
            UpdateInfo::Version { version, .. } => {
                let current = match data {
                    Some(SourceData::Composer(d)) => d.version,
                    Some(SourceData::GitTag(d)) => d.version,
                    _ => String::new(),
                };
                format!("{} -> {}", current, version)
            }
            UpdateInfo::Revision { rev, count } => {
                format!("{} -> {} ({} revs)", current_rev, abbrev(rev), count)
            }
            UpdateInfo::BranchSwitch { branch, .. } => {
                let current = match data {
                    Some(SourceData::GitRel(d)) => d.branch,
                    _ => current_rev,
                };
                format!("{} -> {}", current, branch)
            }
        }
    }
}

impl SourceData {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceData::Composer(_) => SourceKind::Composer,
            SourceData::GitTag(_) => SourceKind::GitTag,
            SourceData::GitMaster(_) => SourceKind::GitMaster,
            SourceData::GitRel(_) => SourceKind::GitRel,
        }
    }
}

fn abbrev(rev: &str) -> &str {
    abbrev_rev(rev).unwrap_or(rev)
}
