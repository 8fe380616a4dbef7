use serde::{Deserialize, Serialize};
use std::fmt;

/// A MediaWiki release line (`major.minor`), e.g. `1.35`
///
/// Serialized as a two element array (`[1, 35]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Release {
    pub major: u32,
    pub minor: u32,
}

impl Release {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the leading `major.minor` of a version string such as `1.35.0-alpha`
    pub fn from_version(version: &str) -> Option<Self> {
        let (major, rest) = version.split_once('.')?;
        if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let minor: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if minor.is_empty() {
            return None;
        }
        Some(Self::new(major.parse().ok()?, minor.parse().ok()?))
    }
}

impl From<[u32; 2]> for Release {
    fn from([major, minor]: [u32; 2]) -> Self {
        Self::new(major, minor)
    }
}

impl From<Release> for [u32; 2] {
    fn from(release: Release) -> Self {
        [release.major, release.minor]
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
