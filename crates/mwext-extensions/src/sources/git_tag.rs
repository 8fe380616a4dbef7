//! git-tag install source
//!
//! Tracks a detached checkout of the newest version tag. Tags are immutable,
//! so updating is a plain checkout of a newer tag.

use super::version::{newer_version_tags, version_tags, VersionTag};
use super::{repository, require_vcs, SourceContext, SourceKind};
use crate::error::{Error, Result};
use crate::types::{TagData, UpdateInfo};
use mwext_core::RemoteExtension;
use mwext_git::{GitOptions, GitRepo};
use tracing::info;

#[derive(Debug, Clone)]
pub struct GitTagSource {
    ctx: SourceContext,
    data: Option<TagData>,
}

impl GitTagSource {
    pub fn new(ctx: SourceContext, data: Option<TagData>) -> Self {
        Self { ctx, data }
    }

    pub fn data(&self) -> Option<&TagData> {
        self.data.as_ref()
    }

    fn installed(&self) -> Result<&TagData> {
        self.data
            .as_ref()
            .ok_or_else(|| self.ctx.missing_data(SourceKind::GitTag))
    }

    /// Matches only a detached HEAD sitting on a version tag
    pub async fn detect(&self) -> Result<Option<TagData>> {
        let git = &self.ctx.git;
        if git.symbolic_ref("HEAD").await?.is_some() {
            return Ok(None);
        }

        let Some(tag) = git.rev_tag().await? else {
            return Ok(None);
        };

        Ok(VersionTag::parse(&tag).map(|t| TagData {
            version_tag: t.tag,
            version: t.version.to_string(),
        }))
    }

    /// Fetch tags from the remote and return the local tag names
    async fn fetched_tags(&self) -> Result<Vec<String>> {
        let git = &self.ctx.git;
        let origin = git.origin().await?;
        git.fetch_tags(&origin).await?;
        Ok(git.tags().await?)
    }

    pub async fn check_for_update(&self) -> Result<Option<UpdateInfo>> {
        let installed = self.installed()?;
        let tags = self.fetched_tags().await?;
        let newer = newer_version_tags(&tags, &installed.version);

        Ok(newer.last().map(|latest| UpdateInfo::Version {
            version: latest.version.to_string(),
            tag: Some(latest.tag.clone()),
            count: newer.len(),
        }))
    }

    /// Clone without a checkout, then check out the newest version tag
    pub async fn download(&self, remote: &RemoteExtension) -> Result<()> {
        let repository = repository(remote, SourceKind::GitTag)?;
        let tags = GitRepo::remote_tags(repository).await?;
        let latest = version_tags(&tags)
            .pop()
            .ok_or_else(|| Error::NoVersionTags {
                repository: repository.to_string(),
            })?;

        let git = &self.ctx.git;
        git.clone_from(
            repository,
            &GitOptions::new()
                .flag("progress", true)
                .flag("no-checkout", true),
        )
        .await?;
        git.checkout(&latest.tag, None).await?;
        Ok(())
    }

    pub async fn apply_update(&self) -> Result<()> {
        let installed = self.installed()?;
        let tags = self.fetched_tags().await?;

        match newer_version_tags(&tags, &installed.version).pop() {
            Some(latest) => Ok(self.ctx.git.checkout(&latest.tag, None).await?),
            None => {
                info!("Nothing to update");
                Ok(())
            }
        }
    }

    pub async fn switch_from(&self, previous: SourceKind) -> Result<()> {
        require_vcs(previous, SourceKind::GitTag)?;

        let tags = self.fetched_tags().await?;
        let latest = version_tags(&tags)
            .pop()
            .ok_or_else(|| Error::NoVersionTags {
                repository: self.ctx.dir.display().to_string(),
            })?;

        Ok(self.ctx.git.checkout(&latest.tag, None).await?)
    }
}
