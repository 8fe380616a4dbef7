//! Shared utility functions for mwext crates

use anyhow::anyhow;
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// sudo/container setups which override HOME are respected.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Abbreviate a commit id to its first 7 hex digits
///
/// Returns `None` when the input does not start with 7 hex digits.
pub fn abbrev_rev(rev: &str) -> Option<&str> {
    let prefix = rev.get(..7)?;
    if prefix.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(prefix)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_home_dir_from_env() {
        if std::env::var("HOME").is_ok() {
            let home = get_home_dir().unwrap();
            assert!(!home.as_os_str().is_empty());
        }
    }

    #[test]
    fn test_abbrev_rev() {
        assert_eq!(
            abbrev_rev("3f2a9c1d0e4b5a6978fedcba0123456789abcdef"),
            Some("3f2a9c1")
        );
        assert_eq!(abbrev_rev("ABCDEF0123"), Some("ABCDEF0"));
        assert_eq!(abbrev_rev("abc"), None);
        assert_eq!(abbrev_rev("master-branch"), None);
    }
}
