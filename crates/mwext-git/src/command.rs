//! Running the git executable

use crate::error::{Error, Result};
use mwext_core::{Tool, ToolResolver};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// A git invocation, optionally bound to a repository directory
///
/// Bound commands run inside the directory with `GIT_DIR=.git` so that an
/// extension directory without its own clone is never mistaken for part of
/// an enclosing repository.
#[derive(Debug, Clone)]
pub struct GitCommand {
    args: Vec<String>,
    dir: Option<PathBuf>,
}

impl GitCommand {
    /// A command not bound to any repository (clone, ls-remote)
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            dir: None,
        }
    }

    /// A command bound to the repository at `dir`
    pub fn bound<I, S>(dir: &Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dir: Some(dir.to_path_buf()),
            ..Self::new(args)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn as_args(&self) -> &[String] {
        &self.args
    }

    async fn command(&self) -> Result<Command> {
        let git = ToolResolver::global().resolve(Tool::Git).await?;

        let mut cmd = Command::new(git);
        cmd.args(&self.args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir).env("GIT_DIR", ".git");
        }

        debug!("Running: git {}", self.args.join(" "));
        Ok(cmd)
    }

    fn describe(&self) -> String {
        format!("git {}", self.args.join(" "))
    }

    /// Run and capture stdout, failing on a non-zero exit
    pub async fn read(&self) -> Result<String> {
        let output = self.command().await?.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::git_operation(format!(
                "{} failed: {}",
                self.describe(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run and return the first line of output, trimmed
    pub async fn oneline(&self) -> Result<String> {
        let stdout = self.read().await?;
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Like [`oneline`](Self::oneline), but a failing command yields `None`
    pub async fn oneline_quiet(&self) -> Result<Option<String>> {
        let output = self
            .command()
            .await?
            .stderr(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            debug!("{} exited with {}", self.describe(), output.status);
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty()))
    }

    /// Run and return the non-empty output lines
    pub async fn lines(&self) -> Result<Vec<String>> {
        let stdout = self.read().await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Run with the terminal attached, streaming git's own progress output
    pub async fn pass(&self) -> Result<()> {
        let status = self
            .command()
            .await?
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        if !status.success() {
            return Err(Error::git_operation(format!(
                "{} exited with {}",
                self.describe(),
                status
            )));
        }

        Ok(())
    }
}
