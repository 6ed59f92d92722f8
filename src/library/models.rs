//! Payloads exchanged with the personal-library backend

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reconcile::secure_url;

/// A book persisted by the backend.
///
/// `id`, `date_added` and `date_updated` are backend-authoritative; the client
/// only ever holds a read-only copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecord {
    pub id: u64,
    #[serde(rename = "googleBooksId")]
    pub external_id: Option<String>,
    pub title: String,
    /// Comma-joined author names
    pub authors: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    /// Comma-joined categories
    pub categories: Option<String>,
    #[serde(rename = "date_added")]
    pub date_added: String,
    #[serde(rename = "date_updated")]
    pub date_updated: String,
}

/// Fields a client may set when creating or updating a record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[serde(rename = "googleBooksId")]
    pub external_id: Option<String>,
    pub title: String,
    pub authors: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub categories: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database_status: Option<String>,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Aggregate counts. Older backends only report `total_books` and
/// `recent_books`, so everything else defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total_books: u64,
    #[serde(default)]
    pub total_authors: u64,
    #[serde(default)]
    pub total_languages: u64,
    pub most_recent_book: Option<String>,
    #[serde(default)]
    pub recent_books: Vec<String>,
}

/// Generic acknowledgement, returned by delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

impl SavedRecord {
    /// Force https on the stored thumbnail
    pub(crate) fn normalized(mut self) -> Self {
        self.thumbnail_url = self.thumbnail_url.as_deref().map(secure_url);
        self
    }

    /// `date_added` as dd/mm/yyyy, or the raw value when it does not parse
    pub fn formatted_date_added(&self) -> String {
        let date_part = self.date_added.split('T').next().unwrap_or_default();
        match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            Ok(date) => date.format("%d/%m/%Y").to_string(),
            Err(_) => self.date_added.clone(),
        }
    }

    pub fn language_name(&self) -> String {
        match self.language.as_deref() {
            Some("en") => "English".to_string(),
            Some("es") => "Spanish".to_string(),
            Some("fr") => "French".to_string(),
            Some("de") => "German".to_string(),
            Some("it") => "Italian".to_string(),
            Some("pt") => "Portuguese".to_string(),
            Some(other) => other.to_string(),
            None => "Not specified".to_string(),
        }
    }

    pub fn truncated_description(&self, max_chars: usize) -> String {
        match &self.description {
            Some(desc) if desc.chars().count() > max_chars => {
                let cut: String = desc.chars().take(max_chars).collect();
                format!("{}...", cut)
            }
            Some(desc) => desc.clone(),
            None => "No description available".to_string(),
        }
    }

    pub fn publication_year(&self) -> String {
        self.published_date
            .as_deref()
            .map(|d| d.chars().take(4).collect())
            .unwrap_or_else(|| "Unknown year".to_string())
    }

    pub fn has_image(&self) -> bool {
        self.thumbnail_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    pub fn secure_thumbnail_url(&self) -> Option<String> {
        self.thumbnail_url.as_deref().map(secure_url)
    }
}
