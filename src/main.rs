//! # newsdesk
//!
//! A news ingestion pipeline that polls RSS/Atom feeds, normalizes and
//! classifies each entry, translates non-English headlines into English,
//! attaches a representative image, and keeps an idempotent article store
//! keyed by URL.
//!
//! ## Features
//!
//! - Built-in catalog of continent, India category, budget, publisher, state
//!   and regional-language feeds (or your own list in a settings file)
//! - Script-based language detection with chunked, concurrent translation
//! - Keyword category classifier and Indian state/UT detector
//! - Image resolution chain with a deterministic placeholder fallback
//! - Maintenance jobs: retention cleanup, image reprocessing,
//!   recategorization, region backfill and rule-based enrichment
//!
//! ## Usage
//!
//! ```sh
//! newsdesk fetch
//! newsdesk schedule --interval 300
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: download and parse each source in turn
//! 2. **Processing**: per entry, age filter, normalize, translate, classify, resolve image
//! 3. **Storing**: atomic upsert by URL, then a JSON snapshot per source
//! 4. **Catch-up**: translate pending articles (20 at a time) and clean up daily

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod classify;
mod cli;
mod config;
mod enrich;
mod error;
mod feeds;
mod http;
mod images;
mod ingest;
mod language;
mod maintenance;
mod models;
mod normalize;
mod scheduler;
mod store;
mod translate;
mod utils;

#[cfg(test)]
mod testing;

use cli::{Cli, Command};
use config::Settings;
use http::HttpFetcher;
use images::ImageResolver;
use ingest::Ingestor;
use scheduler::Scheduler;
use store::ArticleStore;
use store::json::JsonStore;
use translate::{GoogleTranslate, RetryTranslate, Translator};
use utils::ensure_writable_dir;

const TRANSLATE_RETRIES: usize = 3;
const TRANSLATE_BASE_DELAY: Duration = Duration::from_millis(500);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.config, ?args.data_dir, ?args.command, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref()).await?;

    if let Err(e) = ensure_writable_dir(&args.data_dir).await {
        error!(
            path = %args.data_dir.display(),
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }
    let store = JsonStore::open(&args.data_dir).await?;

    // ---- Network collaborators ----
    let fetcher = HttpFetcher::new(&settings.user_agent)?;
    let backend = RetryTranslate::new(
        GoogleTranslate::new(fetcher.clone(), Duration::from_secs(settings.http_timeout_secs)),
        TRANSLATE_RETRIES,
        TRANSLATE_BASE_DELAY,
    );
    let mut translator_options = settings.translator_options();
    if let Command::Translate {
        workers: Some(workers),
        ..
    } = &args.command
    {
        translator_options.workers = *workers;
    }
    let translator = Translator::new(backend, translator_options);
    let images = ImageResolver::new(
        fetcher.clone(),
        settings.wikipedia(fetcher.clone()),
        Duration::from_secs(settings.http_timeout_secs),
    );
    let ingestor = Ingestor::new(&fetcher, &translator, &images, &store, settings.ingest_options());

    match args.command {
        Command::Fetch { only } => {
            let sources = settings.feeds(&only);
            info!(sources = sources.len(), "Fetching once");
            let report = ingestor.run(&sources).await?;
            for (key, count) in &report {
                info!(source = %key, new = count, "Source result");
            }
            info!(total_new = report.values().sum::<usize>(), "Fetch complete");
        }
        Command::Schedule {
            interval,
            no_startup_run,
            only,
        } => {
            let mut options = settings.schedule_options();
            if let Some(secs) = interval {
                options.interval = Duration::from_secs(secs.max(1));
            }
            if no_startup_run {
                options.run_on_startup = false;
            }
            Scheduler::new(ingestor, &translator, &store, settings.feeds(&only), options)
                .run()
                .await?;
        }
        Command::Cleanup { days } => {
            let days = days.unwrap_or(settings.retention_days);
            maintenance::cleanup(&store, days, Utc::now()).await?;
        }
        Command::Translate {
            limit, all, stats, ..
        } => {
            if stats {
                let s = maintenance::translation_stats(&store).await?;
                info!(
                    total = s.total,
                    translated = s.translated,
                    pending = s.pending,
                    "Translation coverage"
                );
            } else {
                let limit = if all { usize::MAX } else { limit };
                let report = translator.translate_pending(&store, limit).await?;
                info!(
                    translated = report.translated,
                    skipped = report.skipped,
                    failed = report.failed,
                    "Translation complete"
                );
            }
        }
        Command::ReprocessImages { all, limit } => {
            maintenance::reprocess_images(&store, &images, all, limit)
                .await?
                .log("reprocess-images");
        }
        Command::Recategorize { all } => {
            maintenance::recategorize(&store, all).await?.log("recategorize");
        }
        Command::BackfillRegions => {
            maintenance::backfill_regions(&store).await?.log("backfill-regions");
        }
        Command::Enrich { limit } => {
            maintenance::enrich_articles(&store, limit).await?.log("enrich");
        }
        Command::Sources => {
            let records = store.sources().await?;
            for feed in settings.feeds(&[]) {
                let record = records.iter().find(|r| r.key == feed.key);
                println!(
                    "{:<28} {:<3} fetched={:<5} errors={:<4} last={}  {}",
                    feed.key,
                    feed.continent.code(),
                    record.map_or(0, |r| r.fetch_count),
                    record.map_or(0, |r| r.error_count),
                    record
                        .and_then(|r| r.last_fetched)
                        .map_or_else(|| "never".to_string(), |t| t.to_rfc3339()),
                    feed.name,
                );
            }
        }
    }

    info!(
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        articles = store.count().await?,
        "newsdesk finished"
    );
    Ok(())
}
