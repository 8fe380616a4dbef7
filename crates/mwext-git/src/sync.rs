//! Pass-through operations
//!
//! These stream git's own output to the terminal and fail when git exits
//! unsuccessfully.

use crate::command::GitCommand;
use crate::error::Result;
use crate::options::GitOptions;
use crate::repo::GitRepo;
use tracing::info;

impl GitRepo {
    /// Clone `repository` into this repository's directory
    pub async fn clone_from(&self, repository: &str, options: &GitOptions) -> Result<()> {
        info!("Cloning {} into {}", repository, self.dir().display());

        GitCommand::new(["clone"])
            .args(options.to_args())
            .arg("--")
            .arg(repository)
            .arg(self.dir().to_string_lossy())
            .pass()
            .await
    }

    /// Check out `reference`
    ///
    /// With `track`, a new local branch named `reference` is created that
    /// tracks the given remote branch.
    pub async fn checkout(&self, reference: &str, track: Option<&str>) -> Result<()> {
        let cmd = match track {
            Some(upstream) => self.git(["checkout", "-b", reference, "--track", upstream]),
            None => self.git(["checkout", reference]),
        };
        cmd.pass().await
    }

    /// Fetch from `remote` (optionally a single `branch`), or the default remote
    pub async fn fetch(&self, remote: Option<&str>, branch: Option<&str>) -> Result<()> {
        self.git(["fetch"])
            .args(remote_args(remote, branch))
            .pass()
            .await
    }

    /// Fetch all tags from `remote`
    pub async fn fetch_tags(&self, remote: &str) -> Result<()> {
        self.git(["fetch", remote, "--tags"]).pass().await
    }

    /// Merge `head` into the current branch
    pub async fn merge(&self, head: &str, options: &GitOptions) -> Result<()> {
        self.git(["merge"])
            .args(options.to_args())
            .arg(head)
            .pass()
            .await
    }

    /// Pull from `remote` (optionally a single `branch`)
    pub async fn pull(
        &self,
        remote: Option<&str>,
        branch: Option<&str>,
        options: &GitOptions,
    ) -> Result<()> {
        self.git(["pull"])
            .args(options.to_args())
            .args(remote_args(remote, branch))
            .pass()
            .await
    }
}

/// A branch is only passed along with its remote
fn remote_args(remote: Option<&str>, branch: Option<&str>) -> Vec<String> {
    match (remote, branch) {
        (Some(remote), Some(branch)) => vec![remote.to_string(), branch.to_string()],
        (Some(remote), None) => vec![remote.to_string()],
        (None, _) => Vec::new(),
    }
}
