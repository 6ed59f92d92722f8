use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shelfctl")]
#[command(about = "CLI tool for searching a book catalog and saving books into your personal library")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Catalog base URL (overrides config)
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// Library backend base URL (overrides config)
    #[arg(long, global = true)]
    pub library_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the book catalog by title or ISBN
    Search {
        /// Title text, or an ISBN with --isbn
        query: String,

        /// Treat the query as an ISBN
        #[arg(long)]
        isbn: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the catalog and save one result into your library
    Save {
        /// Title text, or an ISBN with --isbn
        query: String,

        /// Treat the query as an ISBN
        #[arg(long)]
        isbn: bool,

        /// Result number to save (1-based); prompts when omitted
        #[arg(long)]
        pick: Option<usize>,
    },

    /// List books saved in your library
    List {
        /// Filter by title or author
        #[arg(long)]
        search: Option<String>,

        /// Maximum number of books (uses config page size if not specified)
        #[arg(long)]
        limit: Option<u32>,

        /// Number of books to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display one saved book
    Show {
        /// Book id in the library
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit fields of a saved book
    Update {
        /// Book id in the library
        id: u64,

        #[command(flatten)]
        fields: UpdateFields,
    },

    /// Remove a book from your library
    Delete {
        /// Book id in the library
        id: u64,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show library statistics
    Stats,

    /// Check that the library backend is reachable
    Health,

    /// List distinct authors in your library
    Authors,

    /// List distinct categories in your library
    Categories,

    /// Create a config file interactively
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Field overrides for `update`; unset flags keep the stored value
#[derive(Args, Debug, Default)]
pub struct UpdateFields {
    #[arg(long)]
    pub title: Option<String>,

    /// Comma-separated author names
    #[arg(long)]
    pub authors: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub publisher: Option<String>,

    #[arg(long)]
    pub published_date: Option<String>,

    #[arg(long)]
    pub page_count: Option<u32>,

    /// Two-letter language code
    #[arg(long)]
    pub language: Option<String>,

    /// Comma-separated categories
    #[arg(long)]
    pub categories: Option<String>,
}
