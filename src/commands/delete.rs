use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};

use super::{runtime, Services};

pub fn run(services: &Services, id: u64, yes: bool) -> Result<()> {
    let rt = runtime()?;

    if !yes {
        let record = rt
            .block_on(services.library.get(id))
            .with_context(|| format!("Failed to fetch book {}", id))?;

        print!("Delete \"{}\" (id {}) from your library? [y/N] ", record.title, id);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") && !input.trim().eq_ignore_ascii_case("yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let ack = rt
        .block_on(services.library.delete(id))
        .with_context(|| format!("Failed to delete book {}", id))?;

    if ack.success {
        println!("{} {}", "✓".green(), ack.message);
    } else {
        println!("{} {}", "!".yellow(), ack.message);
    }
    Ok(())
}
