//! Outbound HTTP behind a small trait so every network-facing stage can be
//! exercised against canned bodies in tests.

use crate::error::{Error, Result};
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// A fetched document together with the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Final URL after redirects.
    pub url: String,
    pub body: String,
}

/// GET a URL with a per-call timeout.
pub trait Fetch {
    async fn get(&self, url: &str, timeout: Duration) -> Result<Fetched>;
}

/// [`Fetch`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client that identifies itself with `user_agent` and follows at
    /// most 10 redirects.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(url = %url))]
    async fn get(&self, url: &str, timeout: Duration) -> Result<Fetched> {
        let t0 = Instant::now();
        let resp = self.client.get(url).timeout(timeout).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = resp.url().to_string();
        let body = resp.text().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = body.len(),
            "fetched"
        );
        Ok(Fetched {
            url: final_url,
            body,
        })
    }
}
