//! Client for the external book catalog

use tracing::{debug, warn};

use super::records::{CatalogRecord, VolumesResponse};
use crate::error::ApiError;
use crate::http::{decode, join_url, Transport};

/// Queries the catalog's `volumes` endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    transport: Transport,
    base_url: String,
}

impl CatalogClient {
    pub fn new(transport: Transport, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Free-text title search.
    ///
    /// An empty list means the catalog had no match, not that the call failed.
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<CatalogRecord>, ApiError> {
        self.query(title).await
    }

    /// Search restricted to the identifier field via the `isbn:` query prefix
    pub async fn search_by_isbn(&self, isbn: &str) -> Result<Vec<CatalogRecord>, ApiError> {
        self.query(&format!("isbn:{}", isbn.trim())).await
    }

    async fn query(&self, q: &str) -> Result<Vec<CatalogRecord>, ApiError> {
        let url = format!(
            "{}?q={}",
            join_url(&self.base_url, "volumes"),
            urlencoding::encode(q)
        );

        let response = self.transport.send(self.transport.client().get(&url)).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), query = q, "catalog search failed");
            return Err(ApiError::Server {
                status: status.as_u16(),
            });
        }

        let volumes: VolumesResponse = decode(response).await?;
        let records = volumes.into_records();
        debug!(query = q, count = records.len(), "catalog search complete");
        Ok(records)
    }
}
