//! Installed extension directories
//!
//! [`Extensions`] is the accessor for the host's `extensions/` directory;
//! [`LocalExtension`] is a handle on one (possibly not yet present) extension.

use crate::error::{Error, Result};
use crate::sources::{InstallSource, Services, SourceContext, SourceKind};
use mwext_core::HostRoot;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

/// Accessor for the extensions directory of one host installation
#[derive(Debug, Clone)]
pub struct Extensions {
    root: Arc<HostRoot>,
    services: Services,
}

impl Extensions {
    pub fn new(root: Arc<HostRoot>, services: Services) -> Self {
        Self { root, services }
    }

    pub fn root(&self) -> &Arc<HostRoot> {
        &self.root
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Handle on an installed extension, failing `EXT_NOT_INSTALLED` when absent
    pub async fn resolve(&self, name: &str) -> Result<LocalExtension> {
        let ext = self.create(name);
        if !ext.exists().await {
            return Err(Error::not_installed(ext.dir().display().to_string()));
        }
        Ok(ext)
    }

    /// Handle on an extension without checking that it exists
    pub fn create(&self, name: &str) -> LocalExtension {
        LocalExtension {
            name: name.to_string(),
            ctx: SourceContext::new(
                self.root.extension_path(name),
                self.root.clone(),
                self.services.clone(),
            ),
        }
    }

    /// Names of the non-hidden directories under `extensions/`, sorted
    pub async fn installed_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(self.root.extensions_dir()).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            if entry.file_type().await?.is_dir() {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

/// One extension directory under the host's `extensions/`
#[derive(Debug, Clone)]
pub struct LocalExtension {
    name: String,
    ctx: SourceContext,
}

impl LocalExtension {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        self.ctx.dir()
    }

    pub fn context(&self) -> &SourceContext {
        &self.ctx
    }

    /// Whether the directory exists
    pub async fn exists(&self) -> bool {
        tokio::fs::metadata(self.dir())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Detect the install source currently in use
    pub async fn detect_source(&self) -> Result<Option<InstallSource>> {
        InstallSource::detect_any(&self.ctx).await
    }

    /// Source of the given kind bound to this extension
    pub fn source_for(&self, kind: SourceKind) -> InstallSource {
        InstallSource::new(kind, self.ctx.clone())
    }

    /// Move the directory to a fresh location under the system temp directory
    ///
    /// Nothing is deleted; the new location is returned. An existing path at
    /// the destination is never overwritten.
    pub async fn relocate(&self) -> Result<PathBuf> {
        let dest = relocation_target(&std::env::temp_dir(), &self.name);
        let from = self.dir().to_path_buf();

        debug!("Relocating {} to {}", from.display(), dest.display());
        if let Err(e) = tokio::fs::rename(&from, &dest).await {
            // rename cannot cross filesystems; fall back to copy and remove
            debug!("Rename failed ({}), copying instead", e);
            let (src, dst) = (from.clone(), dest.clone());
            tokio::task::spawn_blocking(move || move_by_copy(&src, &dst))
                .await
                .map_err(|e| relocation_error(&from, &dest, e.to_string()))?
                .map_err(|e| relocation_error(&from, &dest, e.to_string()))?;
        }

        warn!("Existing extension relocated to {}", dest.display());
        info!("Relocated {} to {}", self.name, dest.display());
        Ok(dest)
    }
}

fn relocation_error(from: &Path, to: &Path, reason: String) -> Error {
    Error::Relocation {
        from: from.display().to_string(),
        to: to.display().to_string(),
        reason,
    }
}

/// `{tmp}/{name}-{12 hex digits}` that does not exist yet
fn relocation_target(tmp: &Path, name: &str) -> PathBuf {
    loop {
        let suffix = Uuid::new_v4().simple().to_string();
        let candidate = tmp.join(format!("{}-{}", name, &suffix[..12]));
        if !candidate.exists() {
            return candidate;
        }
    }
}

fn move_by_copy(from: &Path, to: &Path) -> std::io::Result<()> {
    if to.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists", to.display()),
        ));
    }

    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(std::io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(std::io::Error::other)?;
        let target = to.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }

    std::fs::remove_dir_all(from)
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(std::fs::read_link(link)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    std::fs::copy(link, target).map(|_| ())
}
