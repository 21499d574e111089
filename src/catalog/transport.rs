//! HTTP transport for catalog requests

use async_trait::async_trait;
use serde_json::Value;

use super::endpoint::Endpoint;
use super::error::{CatalogError, Result};

/// Query string pairs sent with a catalog request
pub type Query = Vec<(String, String)>;

/// Performs one authenticated GET against the catalog and returns the JSON body
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get(&self, endpoint: &Endpoint, query: Query, bearer: &str) -> Result<Value>;
}

/// `reqwest`-backed transport against the public Web API
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get(&self, endpoint: &Endpoint, query: Query, bearer: &str) -> Result<Value> {
        let url = endpoint.url(&self.base_url);
        crate::log_api_request!("catalog_get", endpoint = %endpoint, url = %url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(bearer)
            .query(&query)
            .send()
            .await
            .map_err(|source| CatalogError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), "Catalog request rejected");
            return Err(CatalogError::Status {
                endpoint: endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| CatalogError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| CatalogError::Decode {
            endpoint: endpoint.clone(),
            source,
        })
    }
}
