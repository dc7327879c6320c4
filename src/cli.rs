//! Command-line interface definitions for newsdesk.
//!
//! Global options can also come from environment variables; every
//! subcommand maps onto one pipeline entry point.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Poll news feeds into a local article store.
///
/// # Examples
///
/// ```sh
/// # One ingestion run over the national publisher feeds
/// newsdesk fetch --only in:
///
/// # Poll every five minutes with a settings file
/// newsdesk --config newsdesk.yaml schedule --interval 300
///
/// # Translate up to 100 pending non-English articles
/// newsdesk translate --limit 100
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "NEWSDESK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the article store
    #[arg(short, long, env = "NEWSDESK_DATA_DIR", default_value = "./data", global = true)]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the ingestion pipeline once
    Fetch {
        /// Only fetch sources with these keys (a trailing `:` matches a prefix)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
    },

    /// Run the pipeline on an interval until interrupted
    Schedule {
        /// Seconds between runs (overrides the settings file)
        #[arg(long)]
        interval: Option<u64>,

        /// Wait one interval before the first run
        #[arg(long)]
        no_startup_run: bool,

        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
    },

    /// Delete articles older than the retention window
    Cleanup {
        /// Retention in days (overrides the settings file)
        #[arg(long)]
        days: Option<i64>,
    },

    /// Translate stored non-English articles
    Translate {
        #[arg(long, default_value_t = 200)]
        limit: usize,

        /// Concurrent translations (overrides the settings file)
        #[arg(long)]
        workers: Option<usize>,

        /// Translate every pending article, ignoring --limit
        #[arg(long)]
        all: bool,

        /// Only print translation coverage
        #[arg(long)]
        stats: bool,
    },

    /// Re-resolve blank or placeholder images
    ReprocessImages {
        /// Reprocess every article, not just blank/placeholder ones
        #[arg(long)]
        all: bool,

        #[arg(long, default_value_t = 500)]
        limit: usize,
    },

    /// Re-run the category classifier on WORLD articles
    Recategorize {
        /// Reclassify every article
        #[arg(long)]
        all: bool,
    },

    /// Detect regions for articles without one
    BackfillRegions,

    /// Compute tags, credibility, sentiment and summary
    Enrich {
        #[arg(long, default_value_t = 500)]
        limit: usize,
    },

    /// List configured sources with their fetch counters
    Sources,
}
