//! Save command - search the catalog and add one result to the library

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, Write};

use super::search::{into_results, print_results, run_search};
use super::{runtime, Services};
use crate::sync::SaveState;

pub fn run(
    services: &Services,
    query: &str,
    isbn: bool,
    pick: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let rt = runtime()?;
    let workflow = services.workflow();

    let records = into_results(rt.block_on(run_search(&workflow, query, isbn)))?;
    if records.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let number = match pick {
        Some(n) => n,
        None => {
            print_results(&records);
            match prompt_pick(records.len())? {
                Some(n) => n,
                None => {
                    println!("Aborted.");
                    return Ok(());
                }
            }
        }
    };

    if number == 0 {
        bail!("Result numbers start at 1");
    }

    if let (false, Some(record)) = (quiet, records.get(number - 1)) {
        println!("Saving \"{}\"...", record.title);
    }

    rt.block_on(workflow.save_selected(number - 1))
        .context("Could not select a result to save")?;

    match workflow.save_state() {
        SaveState::Saved(record) => {
            println!(
                "{} Saved \"{}\" to your library (id {})",
                "✓".green(),
                record.title,
                record.id
            );
            Ok(())
        }
        SaveState::AlreadySaved { title } => {
            println!(
                "{} \"{}\" is already in your library",
                "•".yellow(),
                title
            );
            Ok(())
        }
        SaveState::SaveFailed(failure) => {
            bail!("Save failed ({}): {}", failure.code, failure)
        }
        SaveState::Idle | SaveState::Saving { .. } => bail!("Save did not complete"),
    }
}

/// Ask for a result number. Empty input means abort.
fn prompt_pick(count: usize) -> Result<Option<usize>> {
    print!("Save which result? [1-{}, empty to abort] ", count);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        return Ok(None);
    }

    let number = input
        .parse::<usize>()
        .with_context(|| format!("Not a result number: {}", input))?;
    Ok(Some(number))
}
