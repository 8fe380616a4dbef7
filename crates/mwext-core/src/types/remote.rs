use serde::{Deserialize, Serialize};

/// Extension record returned by the extension metadata API
///
/// Fetched read-only; never persisted locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteExtension {
    /// Extension name (e.g., "ParserFunctions")
    #[serde(default)]
    pub name: String,

    /// Identifier assigned by the metadata service
    #[serde(default)]
    pub id: Option<String>,

    /// Advertised install source names, in the service's order of preference
    #[serde(default)]
    pub sources: Vec<String>,

    /// Git repository URL
    #[serde(default)]
    pub repository: Option<String>,

    /// Composer package name, when the extension is published to Packagist
    #[serde(default)]
    pub composer_name: Option<String>,

    /// Free-form version hint
    #[serde(default)]
    pub version_hint: Option<String>,
}

impl RemoteExtension {
    /// Whether the service advertises the named install source
    pub fn supports(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s == source)
    }
}
