//! Host root (MediaWiki installation) resolution
//!
//! The host root is located once per process, either from `MW_INSTALL_PATH` or
//! by walking up from the working directory until `includes/DefaultSettings.php`
//! is found. Its declared version is read lazily and memoized.

use crate::error::{Error, Result};
use crate::types::Release;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::sync::OnceCell;
use tracing::debug;

/// Environment variable naming the MediaWiki install path
pub const INSTALL_PATH_ENV: &str = "MW_INSTALL_PATH";

static WG_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\$wgVersion\s*=\s*(?:'([^']+)'|"([^"]+)")"#).expect("wgVersion regex is valid")
});

static MW_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"define\(\s*['"]MW_VERSION['"]\s*,\s*(?:'([^']+)'|"([^"]+)")"#)
        .expect("MW_VERSION regex is valid")
});

/// Declared version of a host installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostVersion {
    /// Full version string (e.g., "1.35.0")
    pub version: String,
    /// Release line derived from the version
    pub release: Release,
}

/// A located MediaWiki installation
#[derive(Debug)]
pub struct HostRoot {
    install_path: PathBuf,
    extensions_dir: PathBuf,
    version: OnceCell<HostVersion>,
}

impl HostRoot {
    /// Locate the host root from the environment or the current directory
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::find(&cwd)
    }

    /// Locate the host root, honouring `MW_INSTALL_PATH` before searching from `cwd`
    pub fn find(cwd: &Path) -> Result<Self> {
        if let Ok(path) = std::env::var(INSTALL_PATH_ENV) {
            debug!("{} set to {}", INSTALL_PATH_ENV, path);
            return Self::open(path);
        }

        Self::search(cwd)
    }

    /// Walk up from `cwd` to the first directory holding `includes/DefaultSettings.php`
    pub fn search(cwd: &Path) -> Result<Self> {
        let found = cwd
            .ancestors()
            .find(|dir| dir.join("includes").join("DefaultSettings.php").is_file())
            .ok_or(Error::NotInInstallPath)?;

        Self::open(found)
    }

    /// Open an install path, verifying that it looks like a MediaWiki install
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let install_path = path.into();
        if !Self::verify(&install_path) {
            return Err(Error::NotInInstallPath);
        }

        debug!("Using MediaWiki install at {}", install_path.display());
        Ok(Self {
            extensions_dir: install_path.join("extensions"),
            install_path,
            version: OnceCell::new(),
        })
    }

    /// Whether a path has `includes/DefaultSettings.php` and an `extensions/` directory
    pub fn verify(path: &Path) -> bool {
        path.join("includes").join("DefaultSettings.php").is_file()
            && path.join("extensions").is_dir()
    }

    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    pub fn extensions_dir(&self) -> &Path {
        &self.extensions_dir
    }

    /// Directory an extension named `name` lives in
    pub fn extension_path(&self, name: &str) -> PathBuf {
        self.extensions_dir.join(name)
    }

    pub fn default_settings(&self) -> PathBuf {
        self.install_path.join("includes").join("DefaultSettings.php")
    }

    pub fn composer_json(&self) -> PathBuf {
        self.install_path.join("composer.json")
    }

    pub fn composer_lock(&self) -> PathBuf {
        self.install_path.join("composer.lock")
    }

    /// Declared version of the install, read on first use
    pub async fn version(&self) -> Result<&HostVersion> {
        self.version.get_or_try_init(|| self.read_version()).await
    }

    /// Release line of the install
    pub async fn release(&self) -> Result<Release> {
        Ok(self.version().await?.release)
    }

    async fn read_version(&self) -> Result<HostVersion> {
        let settings = tokio::fs::read_to_string(self.default_settings()).await?;
        if let Some(version) = parse_declared_version(&settings, &WG_VERSION_RE) {
            return version_info(version);
        }

        // Newer releases declare the version in Defines.php
        let defines = self.install_path.join("includes").join("Defines.php");
        match tokio::fs::read_to_string(&defines).await {
            Ok(text) => match parse_declared_version(&text, &MW_VERSION_RE) {
                Some(version) => version_info(version),
                None => Err(Error::NoVersion),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NoVersion),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

fn parse_declared_version(text: &str, re: &Regex) -> Option<String> {
    let caps = re.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn version_info(version: String) -> Result<HostVersion> {
    let release = Release::from_version(&version).ok_or(Error::NoVersion)?;
    Ok(HostVersion { version, release })
}
