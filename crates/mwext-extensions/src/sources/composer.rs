//! Composer install source
//!
//! An extension is installed through Composer when its own composer.json names
//! a package that is present in the host's composer.lock. Its files belong to
//! Composer, so removal also goes through Composer to keep the host's
//! composer.json and composer.lock consistent.

use super::version::newer_release_versions;
use super::{SourceContext, SourceKind};
use crate::composer::composer_args;
use crate::error::{Error, Result};
use crate::types::{ComposerData, UpdateInfo};
use mwext_core::RemoteExtension;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ComposerSource {
    ctx: SourceContext,
    data: Option<ComposerData>,
}

/// Read a JSON file, `None` when it does not exist
async fn read_json(path: &Path) -> Result<Option<Value>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

impl ComposerSource {
    pub fn new(ctx: SourceContext, data: Option<ComposerData>) -> Self {
        Self { ctx, data }
    }

    pub fn data(&self) -> Option<&ComposerData> {
        self.data.as_ref()
    }

    fn installed(&self) -> Result<&ComposerData> {
        self.data
            .as_ref()
            .ok_or_else(|| self.ctx.missing_data(SourceKind::Composer))
    }

    pub async fn detect(&self) -> Result<Option<ComposerData>> {
        let ext_manifest = self.ctx.dir.join("composer.json");
        let root_manifest = self.ctx.root.composer_json();
        let lock_file = self.ctx.root.composer_lock();
        let (ext_meta, root_meta, root_lock) = tokio::try_join!(
            read_json(&ext_manifest),
            read_json(&root_manifest),
            read_json(&lock_file),
        )?;

        let (Some(ext_meta), Some(root_meta), Some(root_lock)) = (ext_meta, root_meta, root_lock)
        else {
            return Ok(None);
        };

        let Some(name) = ext_meta.get("name").and_then(Value::as_str) else {
            return Ok(None);
        };

        let locked = root_lock
            .get("packages")
            .and_then(Value::as_array)
            .and_then(|packages| {
                packages
                    .iter()
                    .find(|p| p.get("name").and_then(Value::as_str) == Some(name))
            });

        let Some(locked) = locked else {
            return Ok(None);
        };

        let version = locked
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let explicit = root_meta
            .get("require")
            .and_then(|require| require.get(name))
            .is_some();

        Ok(Some(ComposerData {
            name: name.to_string(),
            version,
            explicit,
        }))
    }

    pub async fn check_for_update(&self) -> Result<Option<UpdateInfo>> {
        let installed = self.installed()?;
        let versions = self.ctx.services.registry.versions(&installed.name).await?;
        let newer = newer_release_versions(&versions, &installed.version);

        Ok(newer.last().map(|latest| UpdateInfo::Version {
            version: latest.clone(),
            tag: None,
            count: newer.len(),
        }))
    }

    async fn require(&self, package: &str) -> Result<()> {
        let args = composer_args("require", package);
        self.ctx
            .services
            .packages
            .run(&args, self.ctx.root.install_path())
            .await
    }

    pub async fn download(&self, remote: &RemoteExtension) -> Result<()> {
        let package = remote
            .composer_name
            .as_deref()
            .ok_or_else(|| Error::incompatible_source(&remote.name, SourceKind::Composer.name()))?;
        self.require(package).await
    }

    pub async fn apply_update(&self) -> Result<()> {
        if self.check_for_update().await?.is_none() {
            info!("Nothing to update");
            return Ok(());
        }

        let installed = self.installed()?;
        self.require(&installed.name).await
    }

    /// Remove the package through Composer
    pub async fn remove(&self) -> Result<()> {
        let installed = self.installed()?;
        debug!("Removing {} with composer", installed.name);

        let args = composer_args("remove", &installed.name);
        self.ctx
            .services
            .packages
            .run(&args, self.ctx.root.install_path())
            .await
    }

    /// There is no safe migration into Composer from any other source
    pub async fn switch_from(&self, previous: SourceKind) -> Result<()> {
        Err(Error::unsupported_switch(
            previous.name(),
            SourceKind::Composer.name(),
        ))
    }
}
