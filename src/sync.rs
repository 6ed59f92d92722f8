//! Search-then-save workflow between the catalog and the library
//!
//! Search and save are independent sub-flows. Each keeps its own state and
//! can be restarted at any time, including while a previous call is still in
//! flight. Nothing is cancelled; a completion is only applied to the shared
//! state when it belongs to the most recently issued call.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{CatalogClient, CatalogRecord};
use crate::error::{ApiError, NetworkKind};
use crate::library::{LibraryClient, SavedRecord};
use crate::reconcile::{derive_external_id, to_create_request};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Title(String),
    Isbn(String),
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchQuery::Title(title) => write!(f, "title \"{}\"", title),
            SearchQuery::Isbn(isbn) => write!(f, "ISBN {}", isbn),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Searching(SearchQuery),
    /// Successful response, possibly with zero records
    Results(Vec<CatalogRecord>),
    SearchFailed(Failure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveState {
    Idle,
    Saving { title: String },
    Saved(SavedRecord),
    /// The backend reported a duplicate. Informational, not a failure.
    AlreadySaved { title: String },
    SaveFailed(Failure),
}

/// Displayable summary of a failed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Machine-readable reason, e.g. `timeout` or `empty_response`
    pub code: &'static str,
    pub message: String,
}

impl From<&ApiError> for Failure {
    fn from(err: &ApiError) -> Self {
        let message = match err {
            ApiError::Network { kind, source } => match kind {
                NetworkKind::Other => format!("{}: {}", kind, source),
                _ => kind.to_string(),
            },
            ApiError::Server { status: 500 } => "internal server error".to_string(),
            ApiError::Server { status } => format!("server error: {}", status),
            ApiError::NotFound => "service not found".to_string(),
            other => other.to_string(),
        };
        Self {
            code: err.code(),
            message,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no search results to select from")]
    NoResults,
    #[error("result {index} is out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },
}

/// State shared between overlapping calls of one sub-flow
struct Tracked<T> {
    issued: AtomicU64,
    state: Mutex<T>,
}

impl<T: Clone> Tracked<T> {
    fn new(initial: T) -> Self {
        Self {
            issued: AtomicU64::new(0),
            state: Mutex::new(initial),
        }
    }

    /// Enter the pending state and hand out a ticket for the completion
    fn begin(&self, pending: T) -> u64 {
        let mut state = self.lock();
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        *state = pending;
        ticket
    }

    /// Apply the outcome unless a newer call has been issued since
    fn finish(&self, ticket: u64, outcome: T) -> bool {
        let mut state = self.lock();
        if self.issued.load(Ordering::SeqCst) == ticket {
            *state = outcome;
            true
        } else {
            debug!(ticket, "discarding stale completion");
            false
        }
    }

    fn current(&self) -> T {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct SyncWorkflow {
    catalog: CatalogClient,
    library: LibraryClient,
    assign_external_id: bool,
    search: Tracked<SearchState>,
    save: Tracked<SaveState>,
}

impl SyncWorkflow {
    pub fn new(catalog: CatalogClient, library: LibraryClient) -> Self {
        Self {
            catalog,
            library,
            assign_external_id: false,
            search: Tracked::new(SearchState::Idle),
            save: Tracked::new(SaveState::Idle),
        }
    }

    /// Send a derived external id with every create
    pub fn with_external_ids(mut self, enabled: bool) -> Self {
        self.assign_external_id = enabled;
        self
    }

    pub fn search_state(&self) -> SearchState {
        self.search.current()
    }

    pub fn save_state(&self) -> SaveState {
        self.save.current()
    }

    pub async fn search_title(&self, title: &str) -> SearchState {
        self.search(SearchQuery::Title(title.trim().to_string())).await
    }

    pub async fn search_isbn(&self, isbn: &str) -> SearchState {
        self.search(SearchQuery::Isbn(isbn.trim().to_string())).await
    }

    /// Run one catalog query and return its outcome.
    pub async fn search(&self, query: SearchQuery) -> SearchState {
        let ticket = self.search.begin(SearchState::Searching(query.clone()));

        let result = match &query {
            SearchQuery::Title(title) if !title.is_empty() => {
                self.catalog.search_by_title(title).await
            }
            SearchQuery::Isbn(isbn) if !isbn.is_empty() => self.catalog.search_by_isbn(isbn).await,
            _ => {
                let outcome = SearchState::SearchFailed(Failure {
                    code: "invalid_query",
                    message: "search query is empty".to_string(),
                });
                self.search.finish(ticket, outcome.clone());
                return outcome;
            }
        };

        let outcome = match result {
            Ok(records) => {
                debug!(%query, count = records.len(), "search finished");
                SearchState::Results(records)
            }
            Err(err) => {
                warn!(%query, error = %err, "search failed");
                SearchState::SearchFailed(Failure::from(&err))
            }
        };

        self.search.finish(ticket, outcome.clone());
        outcome
    }

    /// Pick a record from the current results (0-based)
    pub fn select(&self, index: usize) -> Result<CatalogRecord, SelectionError> {
        match self.search.current() {
            SearchState::Results(records) if records.is_empty() => Err(SelectionError::NoResults),
            SearchState::Results(records) => {
                let len = records.len();
                records
                    .into_iter()
                    .nth(index)
                    .ok_or(SelectionError::OutOfRange {
                        index: index + 1,
                        len,
                    })
            }
            _ => Err(SelectionError::NoResults),
        }
    }

    pub async fn save_selected(&self, index: usize) -> Result<SaveState, SelectionError> {
        let record = self.select(index)?;
        Ok(self.save(&record).await)
    }

    /// Reconcile a catalog record and create it in the library.
    pub async fn save(&self, record: &CatalogRecord) -> SaveState {
        let mut request = to_create_request(record);
        if self.assign_external_id {
            request.external_id = Some(derive_external_id(record));
        }

        let ticket = self.save.begin(SaveState::Saving {
            title: record.title.clone(),
        });

        let outcome = match self.library.create(&request).await {
            Ok(saved) => SaveState::Saved(saved),
            Err(ApiError::Conflict) => SaveState::AlreadySaved {
                title: record.title.clone(),
            },
            Err(err) => {
                warn!(title = %record.title, error = %err, "save failed");
                SaveState::SaveFailed(Failure::from(&err))
            }
        };

        self.save.finish(ticket, outcome.clone());
        outcome
    }
}
