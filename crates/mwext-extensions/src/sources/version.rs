//! Version strings and version tags
//!
//! Two schemes are in use. Composer releases are dotted numbers of two to
//! four components compared component by component. Git version tags are
//! `v?MAJOR.MINOR(.PATCH)?` and are ordered as semantic versions.

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::sync::LazyLock;

static RELEASE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+){1,3}$").expect("release version regex is valid"));

static VERSION_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)(?:\.(\d+))?$").expect("version tag regex is valid")
});

/// Whether `version` is a plain numeric release (no pre-release or dev suffix)
pub fn is_release_version(version: &str) -> bool {
    RELEASE_VERSION_RE.is_match(version)
}

/// Split into four numeric components, missing or unparsable ones as 0
///
/// A leading `v` is ignored so locked versions such as `v1.4.0` compare
/// against published `1.4.1`.
fn components(version: &str) -> [u64; 4] {
    let version = version.strip_prefix('v').unwrap_or(version);
    let mut parts = [0u64; 4];
    for (slot, part) in parts.iter_mut().zip(version.split('.')) {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        *slot = digits.parse().unwrap_or(0);
    }
    parts
}

/// Component-wise numeric comparison of two release versions
pub fn compare_release_versions(a: &str, b: &str) -> Ordering {
    components(a).cmp(&components(b))
}

/// Published release versions strictly newer than `installed`, oldest first
pub fn newer_release_versions<'a, I>(versions: I, installed: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut newer: Vec<String> = versions
        .into_iter()
        .filter(|v| is_release_version(v))
        .filter(|v| compare_release_versions(v, installed) == Ordering::Greater)
        .cloned()
        .collect();
    newer.sort_by(|a, b| compare_release_versions(a, b));
    newer
}

/// A git tag that names a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    /// Tag as named in the repository
    pub tag: String,
    /// Normalized version
    pub version: Version,
}

impl VersionTag {
    /// Parse a tag, `None` when it does not name a version
    pub fn parse(tag: &str) -> Option<Self> {
        let caps = VERSION_TAG_RE.captures(tag)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };

        Some(Self {
            tag: tag.to_string(),
            version: Version::new(major, minor, patch),
        })
    }
}

/// Version tags among `tags`, ordered oldest to newest
pub fn version_tags<S: AsRef<str>>(tags: &[S]) -> Vec<VersionTag> {
    let mut parsed: Vec<VersionTag> = tags
        .iter()
        .filter_map(|t| VersionTag::parse(t.as_ref()))
        .collect();
    parsed.sort_by(|a, b| a.version.cmp(&b.version));
    parsed
}

/// Version tags strictly newer than `installed`, oldest first
pub fn newer_version_tags<S: AsRef<str>>(tags: &[S], installed: &str) -> Vec<VersionTag> {
    let installed = Version::parse(installed).ok();
    version_tags(tags)
        .into_iter()
        .filter(|t| installed.as_ref().map_or(true, |v| t.version > *v))
        .collect()
}
