pub mod delete;
pub mod health;
pub mod init;
pub mod list;
pub mod save;
pub mod search;
pub mod show;
pub mod stats;
pub mod update;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::http::Transport;
use crate::library::LibraryClient;
use crate::sync::SyncWorkflow;

/// Clients built once from config and shared by every command
pub struct Services {
    pub catalog: CatalogClient,
    pub library: LibraryClient,
    pub page_size: u32,
    assign_external_id: bool,
}

impl Services {
    pub fn new(
        config: &Config,
        catalog_url: Option<&str>,
        library_url: Option<&str>,
    ) -> Result<Self> {
        let transport =
            Transport::new(&config.http.settings()).context("Failed to set up HTTP client")?;

        Ok(Self {
            catalog: CatalogClient::new(transport.clone(), config.catalog_url(catalog_url)),
            library: LibraryClient::new(transport, config.library_url(library_url)),
            page_size: config.library.page_size,
            assign_external_id: config.library.assign_external_id,
        })
    }

    pub fn workflow(&self) -> SyncWorkflow {
        SyncWorkflow::new(self.catalog.clone(), self.library.clone())
            .with_external_ids(self.assign_external_id)
    }
}

/// Runtime for driving the async clients from synchronous commands
pub fn runtime() -> Result<Runtime> {
    Runtime::new().context("Failed to create tokio runtime")
}
