//! Test doubles for the network seams.

use crate::error::{Error, Result};
use crate::http::{Fetch, Fetched};
use crate::translate::Translate;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves canned bodies by URL; any other URL fails with a 404.
#[derive(Debug, Clone, Default)]
pub struct StubFetcher {
    pages: Arc<HashMap<String, Fetched>>,
    calls: Arc<AtomicUsize>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, body: &str) -> Self {
        self.with_redirect(url, url, body)
    }

    /// Serve `body` for `url` as if it had been redirected to `final_url`.
    pub fn with_redirect(self, url: &str, final_url: &str, body: &str) -> Self {
        let mut pages = (*self.pages).clone();
        pages.insert(
            url.to_string(),
            Fetched {
                url: final_url.to_string(),
                body: body.to_string(),
            },
        );
        Self {
            pages: Arc::new(pages),
            calls: self.calls,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for StubFetcher {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<Fetched> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| Error::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

/// Translates by table lookup, falling back to `"[en] " + text`.
#[derive(Debug, Clone, Default)]
pub struct StubTranslator {
    table: Arc<HashMap<String, String>>,
    delays: Arc<HashMap<String, Duration>>,
    failures: Arc<HashSet<String>>,
    calls: Arc<AtomicUsize>,
}

impl StubTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: &str, translated: &str) -> Self {
        Arc::make_mut(&mut self.table).insert(source.to_string(), translated.to_string());
        self
    }

    /// Sleep before answering for `source`.
    pub fn with_delay(mut self, source: &str, delay: Duration) -> Self {
        Arc::make_mut(&mut self.delays).insert(source.to_string(), delay);
        self
    }

    /// Fail whenever asked to translate `source`.
    pub fn failing_on(mut self, source: &str) -> Self {
        Arc::make_mut(&mut self.failures).insert(source.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Translate for StubTranslator {
    async fn translate(&self, text: &str, _source_lang: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(text) {
            return Err(Error::Translation(format!("stub refused {text:?}")));
        }
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[en] {text}")))
    }
}
