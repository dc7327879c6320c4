//! Translation of non-English articles into English.
//!
//! # Overview
//!
//! - [`Translator::translate_text`]: one string, chunked when long, never fails
//! - [`Translator::translate_inline`]: title + description during ingestion
//! - [`Translator::translate_article`]: one stored article, idempotent
//! - [`Translator::translate_batch`] / [`Translator::translate_pending`]: bounded
//!   concurrent passes over the store
//!
//! # Idempotence
//!
//! An article marked `is_translated` keeps its title and description. The only
//! thing a later pass may still do is translate a body that arrived after the
//! headline was translated (tracked by `original_content` being empty).

pub mod backend;
pub mod chunk;

pub use backend::{GoogleTranslate, RetryTranslate, Translate};

use crate::language::{self, Language};
use crate::models::{Article, TranslationShadow};
use crate::normalize::truncate_chars;
use crate::store::ArticleStore;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Concurrency and size limits.
#[derive(Debug, Clone, Copy)]
pub struct TranslatorOptions {
    /// Articles translated concurrently by the batch driver.
    pub workers: usize,
    /// Chunk calls in flight for one long text.
    pub chunk_workers: usize,
    pub chunk_max_chars: usize,
    /// Descriptions are cut to this many characters before translation.
    pub description_max_chars: usize,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            workers: 20,
            chunk_workers: 4,
            chunk_max_chars: 1500,
            description_max_chars: 5000,
        }
    }
}

/// Result of translating a title/description pair before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineTranslation {
    pub title: String,
    pub description: String,
    pub language: Language,
    /// Set only when the title actually changed.
    pub shadow: Option<TranslationShadow>,
}

impl InlineTranslation {
    pub fn translated(&self) -> bool {
        self.shadow.is_some()
    }
}

/// What happened to one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Translated,
    /// Already English, or already fully translated.
    Skipped,
    Failed,
}

/// Aggregate counts from a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Translated => self.translated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Language of a title/description pair: the title decides unless it reads
/// as English, in which case the description gets a say.
pub fn pair_language(title: &str, description: &str) -> Language {
    let lang = language::detect(title);
    if lang.is_non_english() {
        return lang;
    }
    let desc_lang = language::detect(description);
    if desc_lang.is_non_english() {
        desc_lang
    } else {
        lang
    }
}

/// True if the pending pass has anything to do for `article`.
pub fn needs_translation(article: &Article) -> bool {
    if !article.is_translated {
        return !article.title.trim().is_empty()
            && pair_language(&article.title, &article.description).is_non_english();
    }
    article.original_content.is_none()
        && article
            .content
            .as_deref()
            .is_some_and(|body| language::detect(body).is_non_english())
}

#[derive(Debug)]
pub struct Translator<T> {
    backend: T,
    options: TranslatorOptions,
}

impl<T: Translate> Translator<T> {
    pub fn new(backend: T, options: TranslatorOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Translate `text`, returning it unchanged on any failure.
    ///
    /// Text longer than one chunk goes through [`chunk::translate_chunks`].
    pub async fn translate_text(&self, text: &str, lang: Language) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        if text.chars().count() > self.options.chunk_max_chars {
            return self.translate_long(text, lang).await;
        }
        match self.backend.translate(text, lang.code()).await {
            Ok(out) if !out.trim().is_empty() => out,
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!(lang = lang.code(), error = %e, "translation failed; keeping original");
                text.to_string()
            }
        }
    }

    /// Paragraph-chunked translation with ordered reassembly.
    pub async fn translate_long(&self, text: &str, lang: Language) -> String {
        let chunks = chunk::split_into_chunks(text, self.options.chunk_max_chars);
        let out = chunk::translate_chunks(
            &self.backend,
            &chunks,
            lang.code(),
            self.options.chunk_workers,
        )
        .await;
        if out.failed > 0 {
            debug!(failed = out.failed, chunks = out.chunks, "some chunks kept source text");
        }
        out.text
    }

    /// Translate a title/description pair before it is stored.
    ///
    /// English input comes back untouched with no shadow. A translation that
    /// leaves the title unchanged also produces no shadow, so the article is
    /// stored as-is and picked up by a later pending pass.
    pub async fn translate_inline(&self, title: &str, description: &str) -> InlineTranslation {
        let lang = pair_language(title, description);
        if !lang.is_non_english() {
            return InlineTranslation {
                title: title.to_string(),
                description: description.to_string(),
                language: lang,
                shadow: None,
            };
        }

        let description = truncate_chars(description, self.options.description_max_chars);
        let (new_title, new_description) = futures::join!(
            self.translate_text(title, lang),
            self.translate_text(description, lang)
        );

        if new_title.trim().is_empty() || new_title == title {
            return InlineTranslation {
                title: title.to_string(),
                description: description.to_string(),
                language: lang,
                shadow: None,
            };
        }

        InlineTranslation {
            title: new_title,
            description: new_description,
            language: lang,
            shadow: Some(TranslationShadow {
                original_title: title.to_string(),
                original_description: description.to_string(),
                language: lang.code().to_string(),
            }),
        }
    }

    /// Translate a stored article in place and save it.
    ///
    /// Untranslated articles get title, description and (if present) body
    /// translated. Translated articles are only revisited for a body that is
    /// still in the source language.
    #[instrument(level = "debug", skip_all, fields(id = article.id))]
    pub async fn translate_article<S: ArticleStore>(
        &self,
        store: &S,
        mut article: Article,
    ) -> Outcome {
        let changed = if article.is_translated {
            self.fill_body(&mut article).await
        } else {
            match self.translate_headline(&mut article).await {
                Outcome::Translated => {
                    self.fill_body(&mut article).await;
                    true
                }
                other => return other,
            }
        };
        if !changed {
            return Outcome::Skipped;
        }

        match store.save(article).await {
            Ok(true) => Outcome::Translated,
            Ok(false) => Outcome::Skipped,
            Err(e) => {
                error!(error = %e, "saving translated article failed");
                Outcome::Failed
            }
        }
    }

    async fn translate_headline(&self, article: &mut Article) -> Outcome {
        let lang = pair_language(&article.title, &article.description);
        if !lang.is_non_english() {
            return Outcome::Skipped;
        }
        info!(
            lang = lang.code(),
            title = %crate::utils::truncate_for_log(&article.title, 50),
            "Translating article"
        );

        let inline = self.translate_inline(&article.title, &article.description).await;
        let Some(shadow) = inline.shadow else {
            return Outcome::Failed;
        };

        article.original_title = Some(shadow.original_title);
        article.original_description =
            Some(shadow.original_description).filter(|d| !d.is_empty());
        article.original_language = Some(shadow.language);
        article.title = inline.title;
        if !inline.description.trim().is_empty() {
            article.description = inline.description;
        }
        article.is_translated = true;
        Outcome::Translated
    }

    /// Translate a non-English body that has not been translated yet.
    async fn fill_body(&self, article: &mut Article) -> bool {
        if article.original_content.is_some() {
            return false;
        }
        let Some(body) = article.content.clone() else {
            return false;
        };
        let lang = language::detect(&body);
        if !lang.is_non_english() {
            return false;
        }
        let translated = self.translate_long(&body, lang).await;
        if translated == body {
            return false;
        }
        article.original_content = Some(body);
        article.content = Some(translated);
        if article.original_language.is_none() {
            article.original_language = Some(lang.code().to_string());
        }
        true
    }

    /// Translate `articles` with at most `workers` in flight.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub async fn translate_batch<S: ArticleStore>(
        &self,
        store: &S,
        articles: Vec<Article>,
    ) -> BatchReport {
        let t0 = Instant::now();
        if articles.is_empty() {
            return BatchReport::default();
        }
        info!(workers = self.options.workers, "Starting translation batch");

        let outcomes: Vec<Outcome> = stream::iter(articles)
            .map(|article| self.translate_article(store, article))
            .buffer_unordered(self.options.workers.max(1))
            .collect()
            .await;

        let mut report = BatchReport::default();
        for outcome in outcomes {
            report.record(outcome);
        }
        info!(
            translated = report.translated,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Translation batch finished"
        );
        report
    }

    /// Find up to `limit` stored articles still needing translation, newest
    /// first, and run them through [`translate_batch`](Self::translate_batch).
    ///
    /// Candidates are drawn from the `limit * 3` newest untranslated articles.
    /// The store is flushed once the batch is done.
    pub async fn translate_pending<S: ArticleStore>(
        &self,
        store: &S,
        limit: usize,
    ) -> crate::error::Result<BatchReport> {
        let candidates = store
            .filter(
                |a| {
                    (!a.is_translated && !a.title.trim().is_empty())
                        || (a.is_translated && a.original_content.is_none() && a.content.is_some())
                },
                Some(limit.saturating_mul(3)),
            )
            .await?;
        let pending: Vec<Article> = candidates
            .into_iter()
            .filter(needs_translation)
            .take(limit)
            .collect();

        if pending.is_empty() {
            info!("No pending non-English articles");
            return Ok(BatchReport::default());
        }
        info!(count = pending.len(), "Found non-English articles to translate");
        let report = self.translate_batch(store, pending).await;
        store.flush().await?;
        Ok(report)
    }
}
