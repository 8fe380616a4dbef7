//! Extension metadata API client

use crate::error::{Error, Result, Service};
use async_trait::async_trait;
use mwext_core::{ConfigStore, RemoteExtension};
use serde_json::Value;
use tracing::debug;

/// User agent sent with every request
pub(crate) const USER_AGENT: &str = concat!("mwext/", env!("CARGO_PKG_VERSION"));

/// Source of remote extension records
#[async_trait]
pub trait ExtensionApi: Send + Sync {
    /// Fetch the remote record for an extension
    async fn get_extension(&self, name: &str) -> Result<RemoteExtension>;
}

/// HTTP client for the extension metadata service
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base: base.into(),
        })
    }

    /// Client for the API base configured in `store`
    pub fn from_config(store: &ConfigStore) -> Result<Self> {
        Self::new(store.api_base())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET an API method, returning its JSON body
    pub async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_connect() {
                Error::no_connection(Service::Api, &self.base)
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if let Some(error) = body.as_ref().and_then(|b| b.get("error")).filter(|e| e.is_object()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown API error");
            return Err(Error::remote(status.as_u16(), message));
        }

        match body {
            Some(body) if status.is_success() => Ok(body),
            _ => Err(Error::remote(status.as_u16(), text)),
        }
    }
}

#[async_trait]
impl ExtensionApi for ApiClient {
    async fn get_extension(&self, name: &str) -> Result<RemoteExtension> {
        let body = self.get(&format!("extension/{}", name)).await?;
        let mut remote: RemoteExtension = serde_json::from_value(body)?;
        if remote.name.is_empty() {
            remote.name = name.to_string();
        }
        Ok(remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("https://example.org/api/").unwrap();
        assert_eq!(client.url("/extension/Foo"), "https://example.org/api/extension/Foo");

        let client = ApiClient::new("https://example.org/api").unwrap();
        assert_eq!(client.url("extension/Foo"), "https://example.org/api/extension/Foo");
    }
}
