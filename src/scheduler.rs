//! Periodic driver: ingest, translate what is pending, and clean up daily.

use crate::error::Result;
use crate::feeds::FeedSource;
use crate::http::Fetch;
use crate::ingest::{Ingestor, RunReport};
use crate::maintenance;
use crate::store::ArticleStore;
use crate::translate::{BatchReport, Translate, Translator};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

const CLEANUP_EVERY: Duration = Duration::from_secs(24 * 60 * 60);

/// Single-flight flag: at most one run holds it at a time.
#[derive(Debug, Default)]
pub struct RunGuard {
    running: AtomicBool,
}

/// Held for the duration of one run; releases the guard on drop.
#[derive(Debug)]
pub struct RunPermit<'a> {
    running: &'a AtomicBool,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another run holds the guard.
    pub fn try_acquire(&self) -> Option<RunPermit<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit {
                running: &self.running,
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleOptions {
    pub interval: Duration,
    pub run_on_startup: bool,
    /// Articles handed to the translator after each run.
    pub pending_limit: usize,
    pub retention_days: i64,
}

/// What one triggered cycle did.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub new_articles: RunReport,
    pub translation: BatchReport,
    /// Articles removed, when retention cleanup was due.
    pub cleaned: Option<usize>,
}

pub struct Scheduler<'a, F, T, S> {
    ingestor: Ingestor<'a, F, T, S>,
    translator: &'a Translator<T>,
    store: &'a S,
    sources: Vec<FeedSource>,
    options: ScheduleOptions,
    guard: RunGuard,
    last_cleanup: Mutex<Option<Instant>>,
}

impl<'a, F, T, S> Scheduler<'a, F, T, S>
where
    F: Fetch + Clone,
    T: Translate,
    S: ArticleStore,
{
    pub fn new(
        ingestor: Ingestor<'a, F, T, S>,
        translator: &'a Translator<T>,
        store: &'a S,
        sources: Vec<FeedSource>,
        options: ScheduleOptions,
    ) -> Self {
        Self {
            ingestor,
            translator,
            store,
            sources,
            options,
            guard: RunGuard::new(),
            last_cleanup: Mutex::new(None),
        }
    }

    /// One cycle, unless a cycle is already in flight (then `Ok(None)`).
    pub async fn trigger(&self) -> Result<Option<CycleReport>> {
        let Some(_permit) = self.guard.try_acquire() else {
            warn!("Previous run still in progress; skipping this trigger");
            return Ok(None);
        };

        let new_articles = self.ingestor.run(&self.sources).await?;
        let translation = self
            .translator
            .translate_pending(self.store, self.options.pending_limit)
            .await?;
        let cleaned = if self.cleanup_due().await {
            Some(maintenance::cleanup(self.store, self.options.retention_days, Utc::now()).await?)
        } else {
            None
        };

        Ok(Some(CycleReport {
            new_articles,
            translation,
            cleaned,
        }))
    }

    async fn cleanup_due(&self) -> bool {
        let mut last = self.last_cleanup.lock().await;
        let due = last.is_none_or(|at| at.elapsed() >= CLEANUP_EVERY);
        if due {
            *last = Some(Instant::now());
        }
        due
    }

    /// Trigger on every interval tick until Ctrl-C.
    ///
    /// A failed cycle is logged and the loop waits for the next tick.
    pub async fn run(&self) -> Result<()> {
        info!(
            interval_secs = self.options.interval.as_secs(),
            sources = self.sources.len(),
            startup_run = self.options.run_on_startup,
            "Scheduler started"
        );
        let mut ticker = tokio::time::interval(self.options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        if !self.options.run_on_startup {
            // The first tick completes immediately.
            ticker.tick().await;
        }

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal; scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.trigger().await {
                        Ok(Some(cycle)) => info!(
                            new = cycle.new_articles.values().sum::<usize>(),
                            translated = cycle.translation.translated,
                            cleaned = cycle.cleaned.unwrap_or(0),
                            "Cycle finished"
                        ),
                        Ok(None) => {}
                        Err(e) => error!(error = %e, "Cycle failed; waiting for the next tick"),
                    }
                }
            }
        }
        Ok(())
    }
}
