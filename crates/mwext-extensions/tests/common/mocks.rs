//! In-memory stand-ins for the external services
//!
//! Install sources reach Packagist, Composer and the metadata API only through
//! traits, so these replace them without network or processes.

#![allow(dead_code)]

use async_trait::async_trait;
use mwext_core::RemoteExtension;
use mwext_extensions::{
    Error, ExtensionApi, PackageManager, PackageRegistry, Result, Services,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Package registry answering from a fixed version table
#[derive(Debug, Default)]
pub struct FakeRegistry {
    versions: HashMap<String, Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package: &str, versions: &[&str]) -> Self {
        self.versions.insert(
            package.to_string(),
            versions.iter().map(|v| v.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl PackageRegistry for FakeRegistry {
    async fn versions(&self, package: &str) -> Result<Vec<String>> {
        self.versions
            .get(package)
            .cloned()
            .ok_or_else(|| Error::remote(404, format!("Package not found: {}", package)))
    }
}

/// Record of a package manager invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCall {
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Package manager that records invocations instead of running Composer
///
/// A `remove` of a package registered with [`Self::owning`] deletes its
/// directory, the way Composer would.
#[derive(Debug, Default)]
pub struct RecordingPackageManager {
    calls: Mutex<Vec<PackageCall>>,
    owned: Mutex<HashMap<String, PathBuf>>,
}

impl RecordingPackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owning(self, package: &str, dir: impl Into<PathBuf>) -> Self {
        self.owned
            .lock()
            .unwrap()
            .insert(package.to_string(), dir.into());
        self
    }

    pub fn calls(&self) -> Vec<PackageCall> {
        self.calls.lock().unwrap().clone()
    }

    /// `(action, package)` of every call, in order
    pub fn actions(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .map(|call| {
                let action = call.args.first().cloned().unwrap_or_default();
                let package = call.args.last().cloned().unwrap_or_default();
                (action, package)
            })
            .collect()
    }
}

#[async_trait]
impl PackageManager for RecordingPackageManager {
    async fn run(&self, args: &[String], cwd: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(PackageCall {
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });

        if args.first().map(String::as_str) == Some("remove") {
            let owned = args
                .last()
                .and_then(|package| self.owned.lock().unwrap().get(package).cloned());
            if let Some(dir) = owned {
                std::fs::remove_dir_all(dir)?;
            }
        }

        Ok(())
    }
}

/// Metadata API answering from a fixed set of records
#[derive(Debug, Default)]
pub struct FakeApi {
    records: HashMap<String, RemoteExtension>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: RemoteExtension) -> Self {
        self.records.insert(record.name.clone(), record);
        self
    }
}

#[async_trait]
impl ExtensionApi for FakeApi {
    async fn get_extension(&self, name: &str) -> Result<RemoteExtension> {
        self.records
            .get(name)
            .cloned()
            .ok_or_else(|| Error::remote(404, format!("Extension not found: {}", name)))
    }
}

/// Services backed by an empty registry and a fresh recorder
pub fn fake_services() -> (Services, Arc<RecordingPackageManager>) {
    services_with(FakeRegistry::new(), RecordingPackageManager::new())
}

pub fn services_with(
    registry: FakeRegistry,
    packages: RecordingPackageManager,
) -> (Services, Arc<RecordingPackageManager>) {
    let packages = Arc::new(packages);
    let services = Services::new(Arc::new(registry), packages.clone());
    (services, packages)
}
