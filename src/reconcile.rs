//! Conversion between catalog records and saved-record shapes
//!
//! Everything here is pure and total: absent inputs become absent outputs and
//! nothing can fail.

use crate::catalog::{CatalogRecord, IdentifierType, ImageLinks, IndustryIdentifier};
use crate::library::{CreateRequest, SavedRecord};

/// Separator used when flattening authors and categories into one string
const LIST_SEPARATOR: &str = ", ";

/// Upper bound on derived external ids
const EXTERNAL_ID_MAX_CHARS: usize = 100;

/// Rewrite an insecure `http://` URL to `https://`; anything else passes through.
pub fn secure_url(url: &str) -> String {
    const INSECURE: &str = "http://";
    match url.get(..INSECURE.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(INSECURE) => {
            format!("https://{}", &url[INSECURE.len()..])
        }
        _ => url.to_string(),
    }
}

/// Build the create payload for a catalog record.
///
/// `external_id` is left unset; see [`derive_external_id`].
pub fn to_create_request(record: &CatalogRecord) -> CreateRequest {
    CreateRequest {
        external_id: None,
        title: record.title.clone(),
        authors: join_list(&record.authors),
        description: record.description.clone(),
        thumbnail_url: record.thumbnail_url().map(secure_url),
        publisher: record.publisher.clone(),
        published_date: record.published_date.clone(),
        page_count: record.page_count,
        language: record.language.clone(),
        isbn10: record
            .identifier(IdentifierType::Isbn10)
            .map(str::to_string),
        isbn13: record
            .identifier(IdentifierType::Isbn13)
            .map(str::to_string),
        categories: join_list(&record.categories),
    }
}

/// Rebuild a catalog-shaped record from a saved one, for display reuse.
pub fn to_display_record(saved: &SavedRecord) -> CatalogRecord {
    let mut industry_identifiers = Vec::new();
    if let Some(isbn) = &saved.isbn10 {
        industry_identifiers.push(IndustryIdentifier {
            kind: IdentifierType::Isbn10,
            identifier: isbn.clone(),
        });
    }
    if let Some(isbn) = &saved.isbn13 {
        industry_identifiers.push(IndustryIdentifier {
            kind: IdentifierType::Isbn13,
            identifier: isbn.clone(),
        });
    }

    CatalogRecord {
        volume_id: saved.external_id.clone().filter(|id| !id.is_empty()),
        title: saved.title.clone(),
        authors: split_list(saved.authors.as_deref()),
        description: saved.description.clone(),
        publisher: saved.publisher.clone(),
        published_date: saved.published_date.clone(),
        page_count: saved.page_count,
        language: saved.language.clone(),
        image_links: saved.thumbnail_url.as_deref().map(|url| ImageLinks {
            thumbnail: secure_url(url),
        }),
        industry_identifiers,
        categories: split_list(saved.categories.as_deref()),
    }
}

/// The client-settable fields of an existing record, for a full update
pub fn to_update_request(saved: &SavedRecord) -> CreateRequest {
    CreateRequest {
        external_id: saved.external_id.clone(),
        title: saved.title.clone(),
        authors: saved.authors.clone(),
        description: saved.description.clone(),
        thumbnail_url: saved.thumbnail_url.as_deref().map(secure_url),
        publisher: saved.publisher.clone(),
        published_date: saved.published_date.clone(),
        page_count: saved.page_count,
        language: saved.language.clone(),
        isbn10: saved.isbn10.clone(),
        isbn13: saved.isbn13.clone(),
        categories: saved.categories.clone(),
    }
}

/// Stable identifier correlating a saved record with its catalog origin.
///
/// Prefers the catalog volume id. Otherwise builds
/// `title_firstauthor_firstidentifier`, lower-cased, spaces as underscores.
pub fn derive_external_id(record: &CatalogRecord) -> String {
    if let Some(id) = record.volume_id.as_deref().filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let slug = |s: Option<&str>| -> String {
        s.map(|s| s.trim().replace(' ', "_").to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    };

    let title = slug(Some(&record.title));
    let author = slug(record.authors.first().map(String::as_str));
    let identifier = slug(
        record
            .industry_identifiers
            .first()
            .map(|id| id.identifier.as_str()),
    );

    format!("{}_{}_{}", title, author, identifier)
        .chars()
        .take(EXTERNAL_ID_MAX_CHARS)
        .collect()
}

fn join_list(items: &[String]) -> Option<String> {
    let kept: Vec<&str> = items
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(LIST_SEPARATOR))
    }
}

fn split_list(joined: Option<&str>) -> Vec<String> {
    joined
        .map(|s| {
            s.split(LIST_SEPARATOR)
                .filter(|part| !part.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
