//! Search command - query the external catalog

use anyhow::{bail, Result};
use colored::Colorize;

use super::{runtime, Services};
use crate::catalog::{CatalogRecord, IdentifierType};
use crate::sync::{SearchState, SyncWorkflow};

/// Run the search command
pub fn run(services: &Services, query: &str, isbn: bool, json: bool) -> Result<()> {
    let workflow = services.workflow();
    runtime()?.block_on(run_search(&workflow, query, isbn));

    let records = into_results(workflow.search_state())?;
    if records.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    if json {
        print_json(&records)?;
    } else {
        print_results(&records);
    }

    Ok(())
}

pub async fn run_search(workflow: &SyncWorkflow, query: &str, isbn: bool) -> SearchState {
    if isbn {
        workflow.search_isbn(query).await
    } else {
        workflow.search_title(query).await
    }
}

/// Unwrap a finished search, turning a failure into an error
pub fn into_results(state: SearchState) -> Result<Vec<CatalogRecord>> {
    match state {
        SearchState::Results(records) => Ok(records),
        SearchState::SearchFailed(failure) => bail!("Search failed: {}", failure),
        SearchState::Idle | SearchState::Searching(_) => bail!("Search did not complete"),
    }
}

pub fn print_results(records: &[CatalogRecord]) {
    println!();
    println!("Found {} result(s):", records.len());
    println!();

    for (i, record) in records.iter().enumerate() {
        println!("{:>3}. {}", i + 1, record.title.bold());

        if !record.authors.is_empty() {
            print!("     by {}", record.authors.join(", ").cyan());
            if let Some(ref date) = record.published_date {
                print!(" ({})", date);
            }
            println!();
        }

        let isbn = record
            .identifier(IdentifierType::Isbn13)
            .or_else(|| record.identifier(IdentifierType::Isbn10));
        if let Some(isbn) = isbn {
            println!("     {}", format!("ISBN {}", isbn).dimmed());
        }

        println!();
    }
}

fn print_json(records: &[CatalogRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{}", json);
    Ok(())
}
