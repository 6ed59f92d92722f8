pub mod client;
pub mod records;

pub use client::CatalogClient;
pub use records::{CatalogRecord, IdentifierType, ImageLinks, IndustryIdentifier};
