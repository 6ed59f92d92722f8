//! Client for the personal-library backend

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::models::{ApiResponse, CreateRequest, HealthStatus, LibraryStats, SavedRecord};
use crate::error::ApiError;
use crate::http::{decode, join_url, Transport};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Calls against `/health` and `/api/*` on the library backend.
#[derive(Debug, Clone)]
pub struct LibraryClient {
    transport: Transport,
    base_url: String,
}

impl LibraryClient {
    pub fn new(transport: Transport, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let request = self.transport.client().get(self.url("health"));
        expect_json(self.transport.send(request).await?).await
    }

    /// List saved records, optionally filtered by a title/author substring.
    ///
    /// Order is whatever the backend returns.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SavedRecord>, ApiError> {
        let mut url = format!("{}?limit={}&offset={}", self.url("api/books"), limit, offset);
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            url.push_str(&format!("&search={}", urlencoding::encode(search)));
        }

        let request = self.transport.client().get(&url);
        let records: Vec<SavedRecord> = expect_json(self.transport.send(request).await?).await?;
        Ok(records.into_iter().map(SavedRecord::normalized).collect())
    }

    /// Create a record. A duplicate comes back as `ApiError::Conflict`.
    pub async fn create(&self, req: &CreateRequest) -> Result<SavedRecord, ApiError> {
        let request = self.transport.client().post(self.url("api/books")).json(req);
        let response = self.transport.send(request).await?;

        match expect_json::<SavedRecord>(response).await {
            Ok(record) => {
                info!(id = record.id, title = %record.title, "book saved");
                Ok(record.normalized())
            }
            Err(ApiError::Conflict) => {
                info!(title = %req.title, "book already in library");
                Err(ApiError::Conflict)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn get(&self, id: u64) -> Result<SavedRecord, ApiError> {
        let request = self.transport.client().get(self.url(&format!("api/books/{}", id)));
        let record: SavedRecord = expect_json(self.transport.send(request).await?).await?;
        Ok(record.normalized())
    }

    pub async fn update(&self, id: u64, req: &CreateRequest) -> Result<SavedRecord, ApiError> {
        let request = self
            .transport
            .client()
            .put(self.url(&format!("api/books/{}", id)))
            .json(req);
        let record: SavedRecord = expect_json(self.transport.send(request).await?).await?;
        Ok(record.normalized())
    }

    pub async fn delete(&self, id: u64) -> Result<ApiResponse, ApiError> {
        let request = self
            .transport
            .client()
            .delete(self.url(&format!("api/books/{}", id)));
        expect_json(self.transport.send(request).await?).await
    }

    pub async fn stats(&self) -> Result<LibraryStats, ApiError> {
        let request = self.transport.client().get(self.url("api/stats"));
        expect_json(self.transport.send(request).await?).await
    }

    /// Distinct author names across the library
    pub async fn authors(&self) -> Result<Vec<String>, ApiError> {
        let request = self.transport.client().get(self.url("api/authors"));
        expect_json(self.transport.send(request).await?).await
    }

    /// Distinct categories across the library
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        let request = self.transport.client().get(self.url("api/categories"));
        expect_json(self.transport.send(request).await?).await
    }
}

/// Map the status, then decode a 2xx body
async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let err = ApiError::from_library_status(status.as_u16());
        if !matches!(err, ApiError::Conflict) {
            warn!(status = status.as_u16(), url = %response.url(), "library request failed");
        }
        return Err(err);
    }
    decode(response).await
}
