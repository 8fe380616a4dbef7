//! Common test utilities for mwext-git
//!
//! Upstream repositories are plain local git repositories created with the
//! real git executable, so clone/fetch/ls-remote run without a network.

#![allow(dead_code)]

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in `dir` with a fixed identity
pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "author@example.org")
        .env("GIT_COMMITTER_NAME", "Test Author")
        .env("GIT_COMMITTER_EMAIL", "author@example.org")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// A local repository standing in for an extension's upstream
pub struct Upstream {
    temp: TempDir,
    path: PathBuf,
}

impl Upstream {
    /// Create a repository on `master` with one commit
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp directory")?;
        let path = temp.path().join("upstream");
        std::fs::create_dir_all(&path)?;

        git(&path, &["init", "-q"])?;
        git(&path, &["symbolic-ref", "HEAD", "refs/heads/master"])?;

        let upstream = Self { temp, path };
        upstream.commit("Initial commit")?;
        Ok(upstream)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Scratch directory alongside the upstream for clones
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    /// Commit a change on the current branch, returning the new commit id
    pub fn commit(&self, message: &str) -> Result<String> {
        let file = self.path.join("CHANGES");
        let mut content = std::fs::read_to_string(&file).unwrap_or_default();
        content.push_str(message);
        content.push('\n');
        std::fs::write(&file, content)?;

        git(&self.path, &["add", "CHANGES"])?;
        git(&self.path, &["commit", "-q", "-m", message])?;
        git(&self.path, &["rev-parse", "HEAD"])
    }

    pub fn tag(&self, name: &str) -> Result<()> {
        git(&self.path, &["tag", name])?;
        Ok(())
    }

    pub fn annotated_tag(&self, name: &str) -> Result<()> {
        git(&self.path, &["tag", "-a", name, "-m", name])?;
        Ok(())
    }

    /// Create `name` at the current commit without switching to it
    pub fn branch(&self, name: &str) -> Result<()> {
        git(&self.path, &["branch", name])?;
        Ok(())
    }

    pub fn checkout(&self, reference: &str) -> Result<()> {
        git(&self.path, &["checkout", "-q", reference])?;
        Ok(())
    }
}
