use thiserror::Error;

use super::endpoint::Endpoint;
use super::types::ContainerType;

/// Errors raised by the catalog facade. Every request failure names the
/// endpoint that failed.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to fetch {endpoint}: HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },

    #[error("Failed to fetch {endpoint}: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read {endpoint} response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to obtain catalog access token: {0}")]
    Token(String),

    #[error("{0} is not a browsable container")]
    NotAContainer(ContainerType),
}

impl CatalogError {
    /// Endpoint that failed, when the failure came from a request
    pub fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            CatalogError::Status { endpoint, .. }
            | CatalogError::Transport { endpoint, .. }
            | CatalogError::Decode { endpoint, .. } => Some(endpoint),
            CatalogError::Token(_) | CatalogError::NotAContainer(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
