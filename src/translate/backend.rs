//! Translation backends with exponential backoff retry logic.
//!
//! - [`Translate`]: core trait, text plus a source-language hint in, English out
//! - [`GoogleTranslate`]: the public `translate_a/single` endpoint over any [`Fetch`]
//! - [`RetryTranslate`]: decorator adding retries to any [`Translate`]
//!
//! # Retry Strategy
//!
//! The delay between retries follows this formula:
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use crate::error::{Error, Result};
use crate::http::Fetch;
use rand::{Rng, rng};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Async text translation into English.
pub trait Translate {
    /// Translate `text` from `source_lang` (ISO 639-1, or `"auto"`) into English.
    async fn translate(&self, text: &str, source_lang: &str) -> Result<String>;
}

/// Free Google Translate endpoint used by browser extensions.
#[derive(Debug, Clone)]
pub struct GoogleTranslate<F> {
    fetcher: F,
    timeout: Duration,
}

impl<F: Fetch> GoogleTranslate<F> {
    pub fn new(fetcher: F, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }
}

/// Request URL for one translation call.
pub fn google_url(text: &str, source_lang: &str) -> String {
    let sl = match source_lang {
        "" | "unknown" => "auto",
        code => code,
    };
    format!(
        "{GOOGLE_ENDPOINT}?client=gtx&sl={sl}&tl=en&dt=t&q={}",
        urlencoding::encode(text)
    )
}

/// Concatenate the translated segments of a `translate_a/single` response.
///
/// The body is a nested array whose first element lists
/// `[translated, original, ...]` tuples, one per sentence.
pub fn parse_google_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)?;
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Translation("response has no segment list".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    if translated.trim().is_empty() {
        return Err(Error::Translation("empty translation".into()));
    }
    Ok(translated)
}

impl<F: Fetch> Translate for GoogleTranslate<F> {
    #[instrument(level = "debug", skip_all, fields(lang = %source_lang, chars = text.chars().count()))]
    async fn translate(&self, text: &str, source_lang: &str) -> Result<String> {
        let resp = self
            .fetcher
            .get(&google_url(text, source_lang), self.timeout)
            .await?;
        parse_google_response(&resp.body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Translate`] implementation.
pub struct RetryTranslate<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T: Translate> RetryTranslate<T> {
    /// # Arguments
    ///
    /// * `inner` - The backend to wrap
    /// * `max_retries` - Attempts after the first one before giving up
    /// * `base_delay` - Initial delay between retries (doubles with each attempt)
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(8),
        }
    }
}

impl<T> fmt::Debug for RetryTranslate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTranslate")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T: Translate> Translate for RetryTranslate<T> {
    async fn translate(&self, text: &str, source_lang: &str) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.translate(text, source_lang).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "translate() exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = if self.base_delay.is_zero() {
                        0
                    } else {
                        rng().random_range(0..=250)
                    };
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "translate() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_parse_google_response_joins_segments() {
        let body = r#"[[["Heavy rain in Chennai. ","சென்னையில் கனமழை. ",null,null,10],["Schools closed.","பள்ளிகள் மூடல்.",null,null,10]],null,"ta"]"#;
        assert_eq!(
            parse_google_response(body).unwrap(),
            "Heavy rain in Chennai. Schools closed."
        );
    }

    #[test]
    fn test_parse_google_response_rejects_garbage() {
        assert!(parse_google_response("{}").is_err());
        assert!(parse_google_response("[[]]").is_err());
        assert!(parse_google_response("<html>").is_err());
    }

    #[test]
    fn test_google_url_uses_auto_for_unknown() {
        let url = google_url("नमस्ते दुनिया", "unknown");
        assert!(url.contains("sl=auto"));
        assert!(url.contains("tl=en"));
        assert!(!url.contains(' '));
    }

    #[tokio::test]
    async fn test_google_translate_over_fetcher() {
        let text = "नमस्ते";
        let fetcher = StubFetcher::new().with(&google_url(text, "hi"), r#"[[["Hello","नमस्ते"]]]"#);
        let backend = GoogleTranslate::new(fetcher, Duration::from_secs(5));
        assert_eq!(backend.translate(text, "hi").await.unwrap(), "Hello");
        assert!(backend.translate("other", "hi").await.is_err());
    }

    struct Flaky {
        failures_left: AtomicUsize,
    }

    impl Translate for Flaky {
        async fn translate(&self, text: &str, _source_lang: &str) -> Result<String> {
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(Error::Translation("quota".into()));
            }
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let flaky = Flaky {
            failures_left: AtomicUsize::new(2),
        };
        let retry = RetryTranslate::new(flaky, 3, Duration::ZERO);
        assert_eq!(retry.translate("ok", "hi").await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max() {
        let flaky = Flaky {
            failures_left: AtomicUsize::new(10),
        };
        let retry = RetryTranslate::new(flaky, 2, Duration::ZERO);
        assert!(retry.translate("ok", "hi").await.is_err());
    }
}
