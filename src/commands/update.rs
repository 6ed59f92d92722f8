//! Update command - edit fields of a saved book

use anyhow::{Context, Result};
use colored::Colorize;

use super::{runtime, Services};
use crate::cli::UpdateFields;
use crate::library::CreateRequest;
use crate::reconcile::to_update_request;

pub fn run(services: &Services, id: u64, fields: &UpdateFields) -> Result<()> {
    let rt = runtime()?;

    let current = rt
        .block_on(services.library.get(id))
        .with_context(|| format!("Failed to fetch book {}", id))?;

    let mut request = to_update_request(&current);
    let changed = apply_overrides(&mut request, fields);

    if changed.is_empty() {
        println!("No changes to apply.");
        return Ok(());
    }

    let updated = rt
        .block_on(services.library.update(id, &request))
        .with_context(|| format!("Failed to update book {}", id))?;

    println!(
        "{} Updated \"{}\": {}",
        "✓".green(),
        updated.title,
        changed.join(", ")
    );
    Ok(())
}

/// Apply CLI overrides, returning the names of fields whose value changed
fn apply_overrides(request: &mut CreateRequest, fields: &UpdateFields) -> Vec<&'static str> {
    let mut changed = Vec::new();

    if let Some(title) = &fields.title {
        if *title != request.title {
            request.title = title.clone();
            changed.push("title");
        }
    }

    let mut set = |name: &'static str, slot: &mut Option<String>, value: &Option<String>| {
        if let Some(value) = value {
            if slot.as_deref() != Some(value.as_str()) {
                *slot = Some(value.clone());
                changed.push(name);
            }
        }
    };

    set("authors", &mut request.authors, &fields.authors);
    set("description", &mut request.description, &fields.description);
    set("publisher", &mut request.publisher, &fields.publisher);
    set("published_date", &mut request.published_date, &fields.published_date);
    set("language", &mut request.language, &fields.language);
    set("categories", &mut request.categories, &fields.categories);

    if let Some(pages) = fields.page_count {
        if request.page_count != Some(pages) {
            request.page_count = Some(pages);
            changed.push("page_count");
        }
    }

    changed
}
