//! Install source descriptors and update descriptors

use mwext_core::Release;
use serde::Serialize;

/// Data recorded for an extension installed through Composer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposerData {
    /// Composer package name (e.g., "mediawiki/semantic-media-wiki")
    pub name: String,
    /// Version locked in the host's composer.lock
    pub version: String,
    /// Whether the host's composer.json requires the package directly
    pub explicit: bool,
}

/// Data recorded for an extension checked out at a version tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagData {
    /// Tag as named in the repository (e.g., "v1.1.0")
    pub version_tag: String,
    /// Normalized three component version (e.g., "1.1.0")
    pub version: String,
}

/// Data recorded for an extension tracking the master branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevData {
    pub rev: String,
}

/// Data recorded for an extension tracking a `REL{major}_{minor}` branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelData {
    pub rel: Release,
    pub branch: String,
    pub rev: String,
}

/// Channel specific descriptor payload
///
/// Only the matching install source interprets its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "data", rename_all = "kebab-case")]
pub enum SourceData {
    Composer(ComposerData),
    GitTag(TagData),
    GitMaster(RevData),
    GitRel(RelData),
}

/// Result of checking upstream for newer content
///
/// `None` in place of an `UpdateInfo` means up to date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpdateInfo {
    /// Newer released versions exist
    Version {
        version: String,
        /// Tag carrying the newest version, for tag based sources
        #[serde(rename = "versionTag", skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        count: usize,
    },
    /// Newer commits exist on the tracked branch
    Revision { rev: String, count: usize },
    /// The host moved to a newer release; a different branch must be checked out
    BranchSwitch { rel: Release, branch: String },
}

/// Tone used when rendering a free-standing status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
}

/// One line of human readable source status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoLine {
    /// `label: value`
    Pair { label: String, value: String },
    /// A free-standing status message
    Notice { tone: Tone, text: String },
}

impl InfoLine {
    pub fn pair(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Pair {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::Notice {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::Notice {
            tone: Tone::Warning,
            text: text.into(),
        }
    }

    pub(crate) fn no_updates() -> Self {
        Self::success("No updates")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_info_shapes() {
        let switch = UpdateInfo::BranchSwitch {
            rel: Release::new(1, 36),
            branch: "REL1_36".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&switch).unwrap(),
            serde_json::json!({"rel": [1, 36], "branch": "REL1_36"})
        );

        let version = UpdateInfo::Version {
            version: "1.1.0".to_string(),
            tag: Some("v1.1.0".to_string()),
            count: 1,
        };
        assert_eq!(
            serde_json::to_value(&version).unwrap(),
            serde_json::json!({"version": "1.1.0", "versionTag": "v1.1.0", "count": 1})
        );
    }

    #[test]
    fn test_source_data_serializes_with_channel() {
        let data = SourceData::GitTag(TagData {
            version_tag: "v1.1.0".to_string(),
            version: "1.1.0".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            serde_json::json!({
                "source": "git-tag",
                "data": {"versionTag": "v1.1.0", "version": "1.1.0"}
            })
        );
    }
}
