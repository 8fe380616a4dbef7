//! Packagist registry client

use crate::api::USER_AGENT;
use crate::error::{Error, Result, Service};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Public Packagist endpoint
pub const PACKAGIST_BASE: &str = "https://packagist.org/";

/// Source of published package versions
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// All version strings published for `package`
    async fn versions(&self, package: &str) -> Result<Vec<String>>;
}

/// HTTP client for the Packagist package metadata endpoint
#[derive(Debug, Clone)]
pub struct PackagistClient {
    client: reqwest::Client,
    base: String,
}

impl PackagistClient {
    pub fn new() -> Result<Self> {
        Self::with_base(PACKAGIST_BASE)
    }

    pub fn with_base(base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base: base.into(),
        })
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}/{}", self.base.trim_end_matches('/'), path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_connect() {
                Error::no_connection(Service::Packagist, &self.base)
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }

        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or(text);
        Err(Error::remote(status.as_u16(), message))
    }
}

#[async_trait]
impl PackageRegistry for PackagistClient {
    async fn versions(&self, package: &str) -> Result<Vec<String>> {
        let body = self.get(&format!("packages/{}.json", package)).await?;

        Ok(body
            .pointer("/package/versions")
            .and_then(Value::as_object)
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default())
    }
}
