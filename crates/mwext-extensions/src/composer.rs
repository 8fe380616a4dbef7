//! Composer invocation

use crate::error::{Error, Result};
use async_trait::async_trait;
use mwext_core::{Tool, ToolResolver};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

/// Flags passed to every require/remove so dependents are updated without prompting
pub const COMPOSER_FLAGS: [&str; 4] = [
    "--update-with-dependencies",
    "--update-no-dev",
    "--ansi",
    "--no-interaction",
];

/// Runs package manager commands, streaming their output to the terminal
#[async_trait]
pub trait PackageManager: Send + Sync {
    async fn run(&self, args: &[String], cwd: &Path) -> Result<()>;
}

/// Arguments for `composer <action> <flags..> <package>`
pub fn composer_args(action: &str, package: &str) -> Vec<String> {
    std::iter::once(action)
        .chain(COMPOSER_FLAGS)
        .chain(std::iter::once(package))
        .map(String::from)
        .collect()
}

/// Composer run through php, with both executables from the tool resolver
#[derive(Clone)]
pub struct Composer {
    resolver: Arc<ToolResolver>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    /// Composer using the process-wide tool resolver
    pub fn new() -> Self {
        Self {
            resolver: ToolResolver::global(),
        }
    }
}

#[async_trait]
impl PackageManager for Composer {
    async fn run(&self, args: &[String], cwd: &Path) -> Result<()> {
        let php = self.resolver.resolve(Tool::Php).await?;
        let composer = self.resolver.resolve(Tool::Composer).await?;

        debug!("Running: composer {} (in {})", args.join(" "), cwd.display());
        let status = Command::new(&php)
            .arg(&composer)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        if !status.success() {
            return Err(Error::command_failed(
                format!("composer {}", args.join(" ")),
                status.to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composer_args() {
        assert_eq!(
            composer_args("require", "mediawiki/foo"),
            vec![
                "require",
                "--update-with-dependencies",
                "--update-no-dev",
                "--ansi",
                "--no-interaction",
                "mediawiki/foo",
            ]
        );
    }
}
