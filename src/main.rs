mod catalog;
mod cli;
mod commands;
mod config;
mod error;
mod http;
mod library;
mod reconcile;
mod sync;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::Services;
use config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        init_tracing(cli.verbose, "warn");
        return commands::init::run(force);
    }

    let config = Config::load()?;
    init_tracing(cli.verbose, &config.logging.level);

    let services = Services::new(
        &config,
        cli.catalog_url.as_deref(),
        cli.library_url.as_deref(),
    )?;

    match cli.command {
        Commands::Search { query, isbn, json } => {
            commands::search::run(&services, &query, isbn, json)?;
        }
        Commands::Save { query, isbn, pick } => {
            commands::save::run(&services, &query, isbn, pick, cli.quiet)?;
        }
        Commands::List {
            search,
            limit,
            offset,
            json,
        } => {
            commands::list::run(&services, search.as_deref(), limit, offset, json)?;
        }
        Commands::Show { id, json } => {
            commands::show::run(&services, id, json, cli.quiet)?;
        }
        Commands::Update { id, fields } => {
            commands::update::run(&services, id, &fields)?;
        }
        Commands::Delete { id, yes } => {
            commands::delete::run(&services, id, yes)?;
        }
        Commands::Stats => commands::stats::run(&services)?,
        Commands::Health => commands::health::run(&services, cli.quiet)?,
        Commands::Authors => commands::stats::authors(&services)?,
        Commands::Categories => commands::stats::categories(&services)?,
        Commands::Init { .. } => {}
    }

    Ok(())
}

/// Log to stderr. RUST_LOG wins, then --verbose, then the config level.
fn init_tracing(verbose: bool, level: &str) {
    let fallback = if verbose { "shelfctl=debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
