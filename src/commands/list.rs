//! List command - page through the saved library

use anyhow::{Context, Result};
use colored::Colorize;

use super::{runtime, Services};
use crate::library::SavedRecord;

pub fn run(
    services: &Services,
    search: Option<&str>,
    limit: Option<u32>,
    offset: u32,
    json: bool,
) -> Result<()> {
    let limit = limit.unwrap_or(services.page_size);
    let records = runtime()?
        .block_on(services.library.list(search, limit, offset))
        .context("Failed to list books")?;

    if json {
        let json = serde_json::to_string_pretty(&records)?;
        println!("{}", json);
        return Ok(());
    }

    if records.is_empty() {
        println!("No books found.");
        return Ok(());
    }

    print_records(&records);
    Ok(())
}

fn print_records(records: &[SavedRecord]) {
    println!();
    println!("{} book(s):", records.len());
    println!();

    for record in records {
        println!("{:>5}  {}", format!("#{}", record.id).dimmed(), record.title.bold());
        if let Some(ref authors) = record.authors {
            println!("       by {}", authors.cyan());
        }
        println!(
            "       {}",
            format!("added {}", record.formatted_date_added()).dimmed()
        );
    }
    println!();
}
