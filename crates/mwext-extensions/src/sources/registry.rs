//! Install source registry
//!
//! The fixed, ordered list of install sources. Detection probes them in this
//! order and stops at the first match.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Prefix shared by the names of git based sources
pub const VCS_PREFIX: &str = "git-";

/// Branch tracked by the git-master source
pub const TRUNK_BRANCH: &str = "master";

/// Install source kinds, in detection priority order
pub const SOURCES: [SourceKind; 4] = [
    SourceKind::Composer,
    SourceKind::GitTag,
    SourceKind::GitMaster,
    SourceKind::GitRel,
];

static BY_NAME: LazyLock<HashMap<&'static str, SourceKind>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(SOURCES.len());
    for kind in SOURCES {
        let previous = map.insert(kind.name(), kind);
        debug_assert!(previous.is_none(), "{} registered twice", kind);
    }
    map
});

/// Upstream distribution channel an extension can be installed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Packagist package managed by Composer
    Composer,
    /// Detached checkout of a version tag
    GitTag,
    /// The master branch
    GitMaster,
    /// The `REL{major}_{minor}` branch matching the host release
    GitRel,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Composer => "composer",
            SourceKind::GitTag => "git-tag",
            SourceKind::GitMaster => "git-master",
            SourceKind::GitRel => "git-rel",
        }
    }

    /// Look up a source by name
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    /// Whether this source is backed by a git clone
    pub fn is_vcs(&self) -> bool {
        self.name().starts_with(VCS_PREFIX)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| Error::unknown_source(s))
    }
}

/// `REL{major}_{minor}` branch name for a release
pub fn release_branch(release: mwext_core::Release) -> String {
    format!("REL{}_{}", release.major, release.minor)
}
