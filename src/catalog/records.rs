//! Book records as returned by the external catalog

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::reconcile::secure_url;

/// One book as known by the catalog. Immutable once built from a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    /// Catalog-assigned volume id, when the response carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    /// Loosely formatted: "2005", "2005-08", or "2005-08-02"
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub image_links: Option<ImageLinks>,
    pub industry_identifiers: Vec<IndustryIdentifier>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: IdentifierType,
    pub identifier: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierType {
    #[serde(rename = "ISBN_10")]
    Isbn10,
    #[serde(rename = "ISBN_13")]
    Isbn13,
    #[serde(rename = "ISSN")]
    Issn,
    #[serde(rename = "OTHER", other)]
    Other,
}

impl CatalogRecord {
    /// Record with only the required title set
    #[cfg(test)]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            volume_id: None,
            title: title.into(),
            authors: Vec::new(),
            description: None,
            publisher: None,
            published_date: None,
            page_count: None,
            language: None,
            image_links: None,
            industry_identifiers: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.image_links.as_ref().map(|links| links.thumbnail.as_str())
    }

    /// First identifier of the given type
    pub fn identifier(&self, kind: IdentifierType) -> Option<&str> {
        self.industry_identifiers
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.identifier.as_str())
    }
}

// ============================================================================
// Catalog Response Structs
// ============================================================================

/// `GET volumes` response. `items` is omitted entirely when nothing matched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumesResponse {
    #[serde(default)]
    items: Vec<VolumeItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeItem {
    id: Option<String>,
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    description: Option<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    page_count: Option<u32>,
    language: Option<String>,
    image_links: Option<WireImageLinks>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

impl VolumesResponse {
    /// Convert to catalog records, dropping items without a title
    pub(crate) fn into_records(self) -> Vec<CatalogRecord> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let id = item.id;
                let info = item.volume_info;
                let Some(title) = info.title else {
                    warn!(volume_id = ?id, "dropping catalog item without a title");
                    return None;
                };

                let image_links = info
                    .image_links
                    .and_then(|links| links.thumbnail.or(links.small_thumbnail))
                    .map(|url| ImageLinks {
                        thumbnail: secure_url(&url),
                    });

                Some(CatalogRecord {
                    volume_id: id,
                    title,
                    authors: info.authors,
                    description: info.description,
                    publisher: info.publisher,
                    published_date: info.published_date,
                    page_count: info.page_count,
                    language: info.language,
                    image_links,
                    industry_identifiers: info.industry_identifiers,
                    categories: info.categories,
                })
            })
            .collect()
    }
}
