//! Health command - check the library backend connection

use anyhow::{bail, Result};
use colored::Colorize;

use super::{runtime, Services};
use crate::sync::Failure;

pub fn run(services: &Services, quiet: bool) -> Result<()> {
    if !quiet {
        println!("Checking {}...", services.library.base_url());
    }

    match runtime()?.block_on(services.library.health()) {
        Ok(health) if health.is_healthy() => {
            println!(
                "{} Connected (database: {})",
                "✓".green(),
                health.database_status.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }
        Ok(health) => {
            println!(
                "{} Library reports status \"{}\" (database: {})",
                "!".yellow(),
                health.status,
                health.database_status.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }
        Err(err) => {
            let failure = Failure::from(&err);
            eprintln!("{} {}", "✗".red(), failure);
            bail!("Library unreachable ({})", failure.code)
        }
    }
}
