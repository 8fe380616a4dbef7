//! Repository queries

use crate::command::GitCommand;
use crate::error::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Output of `name-rev --always` when no symbolic name exists
static SHORT_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{7,40}$").expect("short hash regex is valid"));

/// Git facade bound to one repository directory
///
/// Holds no state beyond the directory; the git executable is resolved
/// through the process-wide tool resolver on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepo {
    dir: PathBuf,
}

impl GitRepo {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn git<I, S>(&self, args: I) -> GitCommand
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GitCommand::bound(&self.dir, args)
    }

    /// Commit id for `reference`
    pub async fn rev_parse(&self, reference: &str) -> Result<String> {
        self.git(["rev-parse", reference]).oneline().await
    }

    /// Full ref that the symbolic ref `reference` points at
    ///
    /// `None` when HEAD is detached or the ref does not exist.
    pub async fn symbolic_ref(&self, reference: &str) -> Result<Option<String>> {
        self.git(["symbolic-ref", reference]).oneline_quiet().await
    }

    /// Commit id for `reference`, only when it resolves to a commit
    pub async fn commit_ref_parse(&self, reference: &str) -> Result<Option<String>> {
        self.git([
            "rev-parse".to_string(),
            "--revs-only".to_string(),
            "--no-flags".to_string(),
            format!("{}^{{commit}}", reference),
        ])
        .oneline_quiet()
        .await
    }

    /// Human readable name for HEAD
    ///
    /// `None` when HEAD can only be described by a commit hash.
    pub async fn rev_name(&self) -> Result<Option<String>> {
        let name = self
            .git(["name-rev", "--name-only", "--no-undefined", "--always", "HEAD"])
            .oneline()
            .await?;
        Ok(symbolic_name(&name))
    }

    /// Tag name for HEAD, without any `^0` suffix
    pub async fn rev_tag(&self) -> Result<Option<String>> {
        let name = self
            .git([
                "name-rev",
                "--name-only",
                "--no-undefined",
                "--tags",
                "--always",
                "HEAD",
            ])
            .oneline_quiet()
            .await?;

        Ok(name
            .as_deref()
            .and_then(symbolic_name)
            .map(|tag| strip_tag_name(&tag).to_string()))
    }

    /// Tags present in the local clone
    pub async fn tags(&self) -> Result<Vec<String>> {
        let refs = self
            .git(["for-each-ref", "--format=%(refname)", "refs/tags/"])
            .lines()
            .await?;

        Ok(refs
            .iter()
            .filter_map(|r| r.strip_prefix("refs/tags/"))
            .map(String::from)
            .collect())
    }

    /// Tags advertised by a remote repository, without a local clone
    pub async fn remote_tags(repository: &str) -> Result<Vec<String>> {
        let lines = GitCommand::new(["ls-remote", "--tags", repository])
            .lines()
            .await?;
        Ok(parse_ls_remote_tags(&lines))
    }

    /// Commits selected by a revision range, newest first
    pub async fn rev_list(&self, range: &str) -> Result<Vec<String>> {
        self.git(["rev-list", range]).lines().await
    }

    /// Name of the remote to sync with
    ///
    /// `origin` when present, otherwise the only configured remote.
    pub async fn origin(&self) -> Result<String> {
        let remotes = self.git(["remote"]).lines().await?;
        let origin = pick_origin(&remotes, &self.dir)?;
        debug!("Using remote {} for {}", origin, self.dir.display());
        Ok(origin)
    }
}

fn symbolic_name(name: &str) -> Option<String> {
    if name.is_empty() || SHORT_HASH_RE.is_match(name) {
        None
    } else {
        Some(name.to_string())
    }
}

/// Strip the decorations `name-rev` puts around tag names
fn strip_tag_name(name: &str) -> &str {
    let name = name.strip_suffix("^0").unwrap_or(name);
    name.strip_prefix("tags/").unwrap_or(name)
}

fn parse_ls_remote_tags(lines: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for line in lines {
        let Some((_, reference)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        let Some(tag) = reference.trim().strip_prefix("refs/tags/") else {
            continue;
        };
        let tag = tag.strip_suffix("^{}").unwrap_or(tag);
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn pick_origin(remotes: &[String], dir: &Path) -> Result<String> {
    if remotes.iter().any(|r| r == "origin") {
        return Ok("origin".to_string());
    }

    match remotes {
        [] => Err(Error::no_remotes(dir.display().to_string())),
        [only] => Ok(only.clone()),
        _ => Err(Error::ambiguous_remote(dir.display().to_string())),
    }
}
