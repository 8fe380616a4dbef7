//! git-rel install source
//!
//! Tracks the `REL{major}_{minor}` branch matching the host's release. When
//! the host moves to a newer release the extension must switch branches,
//! which is reported as [`UpdateInfo::BranchSwitch`] rather than a commit count.

use super::{release_branch, repository, require_vcs, SourceContext, SourceKind};
use crate::error::{Error, Result};
use crate::types::{RelData, UpdateInfo};
use mwext_core::{Release, RemoteExtension};
use mwext_git::GitOptions;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static REL_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^refs/heads/(REL(\d+)_(\d+))$").expect("release branch regex is valid")
});

#[derive(Debug, Clone)]
pub struct GitRelSource {
    ctx: SourceContext,
    data: Option<RelData>,
}

/// Parse `refs/heads/REL1_35` into its branch name and release
fn parse_release_head(head: &str) -> Option<(String, Release)> {
    let caps = REL_HEAD_RE.captures(head)?;
    let major = caps.get(2)?.as_str().parse().ok()?;
    let minor = caps.get(3)?.as_str().parse().ok()?;
    Some((caps.get(1)?.as_str().to_string(), Release::new(major, minor)))
}

impl GitRelSource {
    pub fn new(ctx: SourceContext, data: Option<RelData>) -> Self {
        Self { ctx, data }
    }

    pub fn data(&self) -> Option<&RelData> {
        self.data.as_ref()
    }

    fn installed(&self) -> Result<&RelData> {
        self.data
            .as_ref()
            .ok_or_else(|| self.ctx.missing_data(SourceKind::GitRel))
    }

    pub async fn detect(&self) -> Result<Option<RelData>> {
        let git = &self.ctx.git;
        let Some(head) = git.symbolic_ref("HEAD").await? else {
            return Ok(None);
        };
        let Some((branch, rel)) = parse_release_head(&head) else {
            return Ok(None);
        };

        let rev = git.rev_parse(&head).await?;
        Ok(Some(RelData { rel, branch, rev }))
    }

    pub async fn check_for_update(&self) -> Result<Option<UpdateInfo>> {
        let installed = self.installed()?;
        let git = &self.ctx.git;
        let origin = git.origin().await?;
        let release = self.ctx.root.release().await?;
        let branch = release_branch(release);

        if installed.rel != release {
            return Ok(Some(UpdateInfo::BranchSwitch {
                rel: release,
                branch,
            }));
        }

        git.fetch(Some(&origin), Some(&branch)).await?;
        let revs = git.rev_list(&format!("HEAD..{}/{}", origin, branch)).await?;
        Ok(revs.first().map(|newest| UpdateInfo::Revision {
            rev: newest.clone(),
            count: revs.len(),
        }))
    }

    /// Clone the release branch matching the host
    pub async fn download(&self, remote: &RemoteExtension) -> Result<()> {
        let repository = repository(remote, SourceKind::GitRel)?;
        let release = self.ctx.root.release().await?;
        let options = GitOptions::new()
            .flag("progress", true)
            .value("branch", release_branch(release));
        Ok(self.ctx.git.clone_from(repository, &options).await?)
    }

    /// Check out the host's release branch if needed, then fast-forward it
    pub async fn apply_update(&self) -> Result<()> {
        let installed = self.installed()?;
        self.sync_release_branch(Some(&installed.branch)).await
    }

    pub async fn switch_from(&self, previous: SourceKind) -> Result<()> {
        require_vcs(previous, SourceKind::GitRel)?;
        self.sync_release_branch(None).await
    }

    /// fetch, then checkout (creating a tracking branch when missing), then fast-forward merge
    ///
    /// The checkout is skipped when `current_branch` already is the target branch.
    async fn sync_release_branch(&self, current_branch: Option<&str>) -> Result<()> {
        let git = &self.ctx.git;
        let origin = git.origin().await?;
        let release = self.ctx.root.release().await?;
        let branch = release_branch(release);
        let upstream = format!("{}/{}", origin, branch);

        git.fetch(Some(&origin), Some(&branch)).await?;

        if current_branch != Some(branch.as_str()) {
            self.checkout_tracking_branch(&branch, &upstream).await?;
        }

        git.merge(&upstream, &GitOptions::new().flag("ff-only", true))
            .await
            .map_err(Error::from)
    }

    async fn checkout_tracking_branch(&self, branch: &str, upstream: &str) -> Result<()> {
        let git = &self.ctx.git;
        if git.commit_ref_parse(branch).await?.is_some() {
            debug!("Checking out existing branch {}", branch);
            git.checkout(branch, None).await?;
        } else {
            debug!("Creating branch {} tracking {}", branch, upstream);
            git.checkout(branch, Some(upstream)).await?;
        }
        Ok(())
    }
}
