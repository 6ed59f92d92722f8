//! Stats, authors and categories commands

use anyhow::{Context, Result};
use colored::Colorize;

use super::{runtime, Services};

pub fn run(services: &Services) -> Result<()> {
    let stats = runtime()?
        .block_on(services.library.stats())
        .context("Failed to fetch library stats")?;

    println!("{:>16}: {}", "Books".cyan(), stats.total_books);
    if stats.total_authors > 0 {
        println!("{:>16}: {}", "Authors".cyan(), stats.total_authors);
    }
    if stats.total_languages > 0 {
        println!("{:>16}: {}", "Languages".cyan(), stats.total_languages);
    }
    if let Some(ref recent) = stats.most_recent_book {
        println!("{:>16}: {}", "Most recent".cyan(), recent);
    }
    if !stats.recent_books.is_empty() {
        println!("{:>16}: {}", "Recently added".cyan(), stats.recent_books.join(", "));
    }

    Ok(())
}

pub fn authors(services: &Services) -> Result<()> {
    let authors = runtime()?
        .block_on(services.library.authors())
        .context("Failed to fetch authors")?;
    print_values(&authors, "No authors yet.");
    Ok(())
}

pub fn categories(services: &Services) -> Result<()> {
    let categories = runtime()?
        .block_on(services.library.categories())
        .context("Failed to fetch categories")?;
    print_values(&categories, "No categories yet.");
    Ok(())
}

fn print_values(values: &[String], empty: &str) {
    if values.is_empty() {
        println!("{}", empty);
        return;
    }
    for value in values {
        println!("{}", value);
    }
}
