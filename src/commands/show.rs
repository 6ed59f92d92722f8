use anyhow::{Context, Result};
use colored::Colorize;

use super::{runtime, Services};
use crate::catalog::IdentifierType;
use crate::library::SavedRecord;
use crate::reconcile::to_display_record;

const DESCRIPTION_LIMIT: usize = 600;

pub fn run(services: &Services, id: u64, json: bool, quiet: bool) -> Result<()> {
    let record = runtime()?
        .block_on(services.library.get(id))
        .with_context(|| format!("Failed to fetch book {}", id))?;

    if json {
        let json = serde_json::to_string_pretty(&record)?;
        println!("{}", json);
    } else {
        print_pretty(&record, quiet);
    }

    Ok(())
}

fn print_pretty(record: &SavedRecord, quiet: bool) {
    let display = to_display_record(record);

    if !quiet {
        println!("{}", display.title.bold());
        println!("{}", "─".repeat(40));
    }

    print_field("Id", Some(&record.id.to_string()));
    if !display.authors.is_empty() {
        print_field("Authors", Some(&display.authors.join(", ")));
    }
    print_field("Publisher", display.publisher.as_deref());
    if display.published_date.is_some() {
        print_field("Year", Some(&record.publication_year()));
    }
    if let Some(pages) = display.page_count {
        print_field("Pages", Some(&pages.to_string()));
    }
    if display.language.is_some() {
        print_field("Language", Some(&record.language_name()));
    }
    if !display.categories.is_empty() {
        print_field("Categories", Some(&display.categories.join(", ")));
    }
    print_field("ISBN-10", display.identifier(IdentifierType::Isbn10));
    print_field("ISBN-13", display.identifier(IdentifierType::Isbn13));
    if record.has_image() {
        print_field("Cover", record.secure_thumbnail_url().as_deref());
    }
    print_field("Added", Some(&record.formatted_date_added()));

    if record.description.is_some() {
        println!();
        println!("{}", "Description:".cyan());
        for line in textwrap_simple(&record.truncated_description(DESCRIPTION_LIMIT), 80) {
            println!("  {}", line);
        }
    }
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("{:>12}: {}", label.cyan(), v);
    }
}

/// Simple text wrapping without external dependency
fn textwrap_simple(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current_line = String::new();

        for word in paragraph.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.len() + 1 + word.len() <= width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = word.to_string();
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textwrap_simple() {
        let lines = textwrap_simple("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_textwrap_keeps_paragraphs() {
        let lines = textwrap_simple("one\ntwo three", 80);
        assert_eq!(lines, vec!["one", "two three"]);
    }
}
