pub mod client;
pub mod models;

pub use client::{LibraryClient, DEFAULT_PAGE_SIZE};
pub use models::{CreateRequest, SavedRecord};
