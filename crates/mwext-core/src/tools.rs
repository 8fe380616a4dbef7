//! External executable lookup
//!
//! git, php and composer are located at most once per process. Each tool's
//! path lives in a [`OnceCell`] on the process-wide [`ToolResolver`], so
//! concurrent first lookups share a single resolution attempt (and at most one
//! prompt to the user).

use crate::config::{ConfigKey, ConfigStore};
use crate::error::{Error, Result};
use crate::utils::get_home_dir;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

static GLOBAL: OnceLock<Arc<ToolResolver>> = OnceLock::new();

/// External tools mwext drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Git,
    Php,
    Composer,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Php, Tool::Git, Tool::Composer];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Git => "git",
            Tool::Php => "php",
            Tool::Composer => "composer",
        }
    }

    /// Executable names searched for on PATH, in order
    pub fn executable_names(&self) -> &'static [&'static str] {
        match self {
            Tool::Git => &["git"],
            Tool::Php => &["php", "php5", "php-cli"],
            Tool::Composer => &["composer", "composer.phar"],
        }
    }

    pub fn config_key(&self) -> ConfigKey {
        match self {
            Tool::Git => ConfigKey::GitPath,
            Tool::Php => ConfigKey::PhpPath,
            Tool::Composer => ConfigKey::ComposerPath,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interactive fallback used when a tool cannot be found automatically
pub trait ExecutablePrompt: Send + Sync {
    /// Ask for a path to `tool`. `problem` describes why the last attempt failed.
    /// Returning `Ok(None)` means the user declined.
    fn ask(&self, tool: Tool, problem: &str) -> anyhow::Result<Option<PathBuf>>;
}

/// A located executable and whether it should be remembered
struct Located {
    path: PathBuf,
    persist: bool,
}

/// Resolves and memoizes paths to external executables
pub struct ToolResolver {
    config: Mutex<Option<ConfigStore>>,
    prompt: Option<Arc<dyn ExecutablePrompt>>,
    git: OnceCell<PathBuf>,
    php: OnceCell<PathBuf>,
    composer: OnceCell<PathBuf>,
}

impl Default for ToolResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolResolver {
    /// Resolver that only searches PATH
    pub fn new() -> Self {
        Self {
            config: Mutex::new(None),
            prompt: None,
            git: OnceCell::new(),
            php: OnceCell::new(),
            composer: OnceCell::new(),
        }
    }

    /// Read configured paths from, and persist discoveries to, `store`
    pub fn with_config(mut self, store: ConfigStore) -> Self {
        self.config = Mutex::new(Some(store));
        self
    }

    /// Ask the user when a tool cannot be found
    pub fn with_prompt(mut self, prompt: impl ExecutablePrompt + 'static) -> Self {
        self.prompt = Some(Arc::new(prompt));
        self
    }

    /// Install this resolver as the process-wide instance
    ///
    /// Only the first installation takes effect; the active instance is returned.
    pub fn install(self) -> Arc<ToolResolver> {
        let resolver = Arc::new(self);
        if GLOBAL.set(resolver.clone()).is_err() {
            warn!("Tool resolver already installed, keeping the existing one");
        }
        Self::global()
    }

    /// The process-wide resolver, defaulting to a PATH-only resolver
    pub fn global() -> Arc<ToolResolver> {
        GLOBAL.get_or_init(|| Arc::new(ToolResolver::new())).clone()
    }

    /// Resolve the path for `tool`, locating it on first use
    pub async fn resolve(&self, tool: Tool) -> Result<PathBuf> {
        self.cell(tool)
            .get_or_try_init(|| self.locate(tool))
            .await
            .cloned()
    }

    fn cell(&self, tool: Tool) -> &OnceCell<PathBuf> {
        match tool {
            Tool::Git => &self.git,
            Tool::Php => &self.php,
            Tool::Composer => &self.composer,
        }
    }

    async fn locate(&self, tool: Tool) -> Result<PathBuf> {
        if let Some(path) = self.configured(tool) {
            return Ok(path);
        }

        let located = match self.search(tool) {
            Some(found) => found,
            None => self.ask(tool).await?,
        };

        if located.persist {
            self.remember(tool, &located.path)?;
        } else {
            info!("Using {} dynamically", located.path.display());
        }

        Ok(located.path)
    }

    fn configured(&self, tool: Tool) -> Option<PathBuf> {
        let guard = self.config.lock().ok()?;
        let configured = guard.as_ref()?.get(tool.config_key())?.to_string();
        drop(guard);

        match check_executable(tool, Path::new(&configured)) {
            Ok(path) => {
                debug!("Using configured {} at {}", tool, path.display());
                Some(path)
            }
            Err(problem) => {
                warn!(
                    "Could not use the {} executable at {} ({}), please reconfigure.",
                    tool, configured, problem
                );
                None
            }
        }
    }

    fn search(&self, tool: Tool) -> Option<Located> {
        for name in tool.executable_names() {
            if let Ok(path) = which::which(name) {
                if let Ok(path) = check_executable(tool, &path) {
                    debug!("Found {} on PATH at {}", tool, path.display());
                    return Some(Located {
                        path,
                        persist: true,
                    });
                }
            }
        }

        if tool == Tool::Composer {
            return find_composer_phar();
        }

        None
    }

    /// Ask the user until a usable path is given or the prompt is declined
    ///
    /// The prompt blocks on terminal input, so it runs on the blocking pool.
    async fn ask(&self, tool: Tool) -> Result<Located> {
        let Some(prompt) = self.prompt.clone() else {
            debug!("No prompt available for {}", tool);
            return Err(Error::executable_declined(tool.name()));
        };

        let mut problem = format!("The {} executable was not found", tool);
        loop {
            let asking = prompt.clone();
            let question = problem.clone();
            let answer = tokio::task::spawn_blocking(move || asking.ask(tool, &question))
                .await
                .map_err(|e| Error::executable_not_found(tool.name(), e.to_string()))?
                .map_err(|e| Error::executable_not_found(tool.name(), e.to_string()))?;

            let Some(candidate) = answer else {
                return Err(Error::executable_declined(tool.name()));
            };

            match check_executable(tool, &candidate) {
                Ok(path) => {
                    return Ok(Located {
                        path,
                        persist: true,
                    })
                }
                Err(reason) => problem = reason,
            }
        }
    }

    fn remember(&self, tool: Tool, path: &Path) -> Result<()> {
        let mut guard = match self.config.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(store) = guard.as_mut() {
            store.set(tool.config_key(), path.to_string_lossy());
            store.save()?;
            info!("{} path set to: {}", tool, path.display());
        }
        Ok(())
    }
}

/// Look for a composer.phar in the home directory, then the working directory
///
/// A phar in the working directory is used without being remembered.
fn find_composer_phar() -> Option<Located> {
    if let Ok(home) = get_home_dir() {
        if let Ok(path) = check_executable(Tool::Composer, &home.join("composer.phar")) {
            return Some(Located {
                path,
                persist: true,
            });
        }
    }

    let cwd = std::env::current_dir().ok()?;
    check_executable(Tool::Composer, &cwd.join("composer.phar"))
        .ok()
        .map(|path| Located {
            path,
            persist: false,
        })
}

/// Check that `path` exists and is executable
///
/// `.phar` files are accepted for composer without the executable bit since
/// they are run through php.
pub fn check_executable(tool: Tool, path: &Path) -> std::result::Result<PathBuf, String> {
    let metadata = std::fs::metadata(path).map_err(|_| "That path does not exist.".to_string())?;
    if !metadata.is_file() {
        return Err("That path is not a file.".to_string());
    }

    let is_phar = path.extension().is_some_and(|ext| ext == "phar");
    if tool == Tool::Composer && is_phar {
        return Ok(path.to_path_buf());
    }

    if !is_executable(&metadata) {
        return Err("That path is not executable.".to_string());
    }

    Ok(path.to_path_buf())
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingPrompt {
        answer: Option<PathBuf>,
        calls: Arc<AtomicUsize>,
    }

    impl ExecutablePrompt for CountingPrompt {
        fn ask(&self, _tool: Tool, _problem: &str) -> anyhow::Result<Option<PathBuf>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    #[cfg(unix)]
    fn fake_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn php_on_path() -> bool {
        Tool::Php
            .executable_names()
            .iter()
            .any(|name| which::which(name).is_ok())
    }

    #[test]
    fn test_check_executable_missing() {
        let err = check_executable(Tool::Git, Path::new("/nonexistent/git")).unwrap_err();
        assert_eq!(err, "That path does not exist.");
    }

    #[test]
    fn test_phar_accepted_without_exec_bit() {
        let temp = TempDir::new().unwrap();
        let phar = temp.path().join("composer.phar");
        std::fs::write(&phar, "phar").unwrap();

        assert!(check_executable(Tool::Composer, &phar).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("git");
        std::fs::write(&file, "").unwrap();

        let err = check_executable(Tool::Git, &file).unwrap_err();
        assert_eq!(err, "That path is not executable.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_configured_path_wins() {
        let temp = TempDir::new().unwrap();
        let php = fake_executable(temp.path(), "my-php");

        let mut store = ConfigStore::empty(temp.path().join("config.yaml"));
        store.set(ConfigKey::PhpPath, php.to_string_lossy());

        let resolver = ToolResolver::new().with_config(store);
        assert_eq!(resolver.resolve(Tool::Php).await.unwrap(), php);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_concurrent_resolution_prompts_once() {
        let temp = TempDir::new().unwrap();
        let php = fake_executable(temp.path(), "php-answer");
        let calls = Arc::new(AtomicUsize::new(0));

        // Nonexistent configured path and no PATH entries force the prompt
        let mut store = ConfigStore::empty(temp.path().join("config.yaml"));
        store.set(ConfigKey::PhpPath, "/nonexistent/php");
        let resolver = Arc::new(
            ToolResolver::new()
                .with_config(store)
                .with_prompt(CountingPrompt {
                    answer: Some(php.clone()),
                    calls: calls.clone(),
                }),
        );

        // The prompt is never consulted when php is installed
        if php_on_path() {
            return;
        }

        let (a, b) = tokio::join!(resolver.resolve(Tool::Php), resolver.resolve(Tool::Php));
        assert_eq!(a.unwrap(), php);
        assert_eq!(b.unwrap(), php);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let saved = ConfigStore::load(&temp.path().join("config.yaml")).unwrap();
        assert_eq!(saved.get(ConfigKey::PhpPath), Some(php.to_str().unwrap()));
    }

    #[tokio::test]
    async fn test_declined_prompt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = ToolResolver::new().with_prompt(CountingPrompt {
            answer: None,
            calls: calls.clone(),
        });

        if php_on_path() {
            return;
        }

        let err = resolver.resolve(Tool::Php).await.unwrap_err();
        assert_eq!(err.code(), Some("EXECUTABLE_DECLINED"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_prompt_declines() {
        if php_on_path() {
            return;
        }

        let err = ToolResolver::new().resolve(Tool::Php).await.unwrap_err();
        assert_eq!(err.code(), Some("EXECUTABLE_DECLINED"));
    }

    /// Answers only once another task on the runtime has handed it a path
    struct WaitingPrompt {
        answers: Mutex<std::sync::mpsc::Receiver<PathBuf>>,
    }

    impl ExecutablePrompt for WaitingPrompt {
        fn ask(&self, _tool: Tool, _problem: &str) -> anyhow::Result<Option<PathBuf>> {
            let answers = self.answers.lock().unwrap();
            Ok(answers.recv_timeout(std::time::Duration::from_secs(5)).ok())
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_prompt_does_not_block_runtime() {
        if php_on_path() {
            return;
        }

        let temp = TempDir::new().unwrap();
        let php = fake_executable(temp.path(), "php-answer");
        let (tx, rx) = std::sync::mpsc::channel();
        let resolver = ToolResolver::new().with_prompt(WaitingPrompt {
            answers: Mutex::new(rx),
        });

        // Single threaded runtime: the sender only runs if the prompt is off the worker
        let answer = php.clone();
        let sender = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            tx.send(answer).unwrap();
        });

        assert_eq!(resolver.resolve(Tool::Php).await.unwrap(), php);
        sender.await.unwrap();
    }
}
