//! git-master install source

use super::{repository, require_vcs, SourceContext, SourceKind, TRUNK_BRANCH};
use crate::error::Result;
use crate::types::{RevData, UpdateInfo};
use mwext_core::RemoteExtension;
use mwext_git::GitOptions;

#[derive(Debug, Clone)]
pub struct GitMasterSource {
    ctx: SourceContext,
    data: Option<RevData>,
}

impl GitMasterSource {
    pub fn new(ctx: SourceContext, data: Option<RevData>) -> Self {
        Self { ctx, data }
    }

    pub fn data(&self) -> Option<&RevData> {
        self.data.as_ref()
    }

    /// Matches when HEAD is the master branch
    pub async fn detect(&self) -> Result<Option<RevData>> {
        let git = &self.ctx.git;
        let head = git.symbolic_ref("HEAD").await?;
        let trunk_ref = format!("refs/heads/{}", TRUNK_BRANCH);
        if head.as_deref() != Some(trunk_ref.as_str()) {
            return Ok(None);
        }

        let rev = git.rev_parse(TRUNK_BRANCH).await?;
        Ok(Some(RevData { rev }))
    }

    /// Commits on the remote master that HEAD does not have yet
    pub async fn check_for_update(&self) -> Result<Option<UpdateInfo>> {
        let git = &self.ctx.git;
        let origin = git.origin().await?;
        git.fetch(Some(&origin), Some(TRUNK_BRANCH)).await?;

        let revs = git
            .rev_list(&format!("HEAD..{}/{}", origin, TRUNK_BRANCH))
            .await?;
        Ok(revs.first().map(|newest| UpdateInfo::Revision {
            rev: newest.clone(),
            count: revs.len(),
        }))
    }

    pub async fn download(&self, remote: &RemoteExtension) -> Result<()> {
        let repository = repository(remote, SourceKind::GitMaster)?;
        let options = GitOptions::new()
            .flag("progress", true)
            .value("branch", TRUNK_BRANCH);
        Ok(self.ctx.git.clone_from(repository, &options).await?)
    }

    /// Fast-forward pull; a diverged clone fails instead of gaining a merge commit
    pub async fn apply_update(&self) -> Result<()> {
        let git = &self.ctx.git;
        let origin = git.origin().await?;
        let options = GitOptions::new()
            .flag("progress", true)
            .flag("ff-only", true);
        Ok(git.pull(Some(&origin), Some(TRUNK_BRANCH), &options).await?)
    }

    pub async fn switch_from(&self, previous: SourceKind) -> Result<()> {
        require_vcs(previous, SourceKind::GitMaster)?;

        let git = &self.ctx.git;
        let origin = git.origin().await?;
        git.fetch(Some(&origin), Some(TRUNK_BRANCH)).await?;
        Ok(git.checkout(TRUNK_BRANCH, None).await?)
    }
}
