//! Scratch host installs and upstream repositories
//!
//! Upstreams are plain local repositories driven by the real git executable,
//! so clone, fetch and ls-remote run without a network.

#![allow(dead_code)]

use anyhow::{bail, Context, Result};
use mwext_core::{HostRoot, RemoteExtension};
use mwext_extensions::{Extensions, Services};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
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

/// A scratch MediaWiki install with an empty extensions directory
pub struct HostFixture {
    temp: TempDir,
    root: Arc<HostRoot>,
}

impl HostFixture {
    /// Install declaring `$wgVersion = '{version}'`
    pub fn new(version: &str) -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp directory")?;
        std::fs::create_dir_all(temp.path().join("includes"))?;
        std::fs::create_dir_all(temp.path().join("extensions"))?;
        write_settings(temp.path(), version)?;

        let root = Arc::new(HostRoot::open(temp.path())?);
        Ok(Self { temp, root })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn root(&self) -> Arc<HostRoot> {
        self.root.clone()
    }

    pub fn extension_dir(&self, name: &str) -> PathBuf {
        self.root.extension_path(name)
    }

    pub fn extensions(&self, services: Services) -> Extensions {
        Extensions::new(self.root.clone(), services)
    }

    /// Declare a new version; the host root is reopened since versions are memoized
    pub fn upgrade(&mut self, version: &str) -> Result<()> {
        write_settings(self.temp.path(), version)?;
        self.root = Arc::new(HostRoot::open(self.temp.path())?);
        Ok(())
    }

    /// Write the host's composer.json and composer.lock
    pub fn write_composer(&self, manifest: &Value, lock: &Value) -> Result<()> {
        std::fs::write(
            self.path().join("composer.json"),
            serde_json::to_string_pretty(manifest)?,
        )?;
        std::fs::write(
            self.path().join("composer.lock"),
            serde_json::to_string_pretty(lock)?,
        )?;
        Ok(())
    }

    /// Create `extensions/{name}` holding only a composer.json naming `package`
    pub fn composer_extension(&self, name: &str, package: &str) -> Result<PathBuf> {
        let dir = self.extension_dir(name);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(
            dir.join("composer.json"),
            serde_json::json!({ "name": package }).to_string(),
        )?;
        Ok(dir)
    }
}

fn write_settings(dir: &Path, version: &str) -> Result<()> {
    std::fs::write(
        dir.join("includes").join("DefaultSettings.php"),
        format!("<?php\n$wgVersion = '{}';\n", version),
    )?;
    Ok(())
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

    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
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

    /// Annotated tag at the current commit
    pub fn annotated_tag(&self, name: &str) -> Result<()> {
        let message = format!("Release {}", name);
        git(&self.path, &["tag", "-a", name, "-m", &message])?;
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

    /// Clone into `dest` and check out `reference` (a tag leaves HEAD detached)
    pub fn install(&self, dest: &Path, reference: &str) -> Result<()> {
        let parent = dest.parent().context("Clone target has no parent")?;
        let dest_str = dest.to_string_lossy().into_owned();
        git(parent, &["clone", "-q", &self.url(), &dest_str])?;
        git(dest, &["checkout", "-q", reference])?;
        Ok(())
    }

    /// Clone into `dest` with a local branch tracking `origin/{branch}`
    pub fn install_branch(&self, dest: &Path, branch: &str) -> Result<()> {
        let parent = dest.parent().context("Clone target has no parent")?;
        let dest_str = dest.to_string_lossy().into_owned();
        git(parent, &["clone", "-q", "--branch", branch, &self.url(), &dest_str])?;
        Ok(())
    }
}

/// Remote record advertising `sources`
pub fn remote_record(name: &str, sources: &[&str], repository: Option<String>) -> RemoteExtension {
    RemoteExtension {
        name: name.to_string(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
        repository,
        ..Default::default()
    }
}
