//! Blocking HTTP client used as the crate's document fetcher.
//!
//! Pacing between requests lives in [crate::throttle]; this client only sends one request per call.

use crate::scraper::{DocumentFetcher, ScraperError};
use scraper::Html;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 10;

/// Blocking HTTP client with a fixed User-Agent and timeout.
#[derive(Debug)]
pub struct PoliteClient {
    inner: reqwest::blocking::Client,
}

impl PoliteClient {
    /// Builder for custom User-Agent and/or timeout.
    pub fn builder() -> PoliteClientBuilder {
        PoliteClientBuilder::default()
    }

    /// GET `url` and return the body as text. Non-2xx statuses are errors.
    pub fn get_text(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .inner
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network {
                url: url.to_string(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response.text().map_err(|e| ScraperError::BodyRead {
            url: url.to_string(),
            source: e,
        })
    }
}

impl DocumentFetcher for PoliteClient {
    fn fetch(&mut self, url: &str) -> Result<Html, ScraperError> {
        let body = self.get_text(url)?;
        debug!(%url, bytes = body.len(), "fetched document");
        Ok(Html::parse_document(&body))
    }
}

/// Builder for PoliteClient with optional User-Agent and timeout.
#[derive(Debug)]
pub struct PoliteClientBuilder {
    user_agent: Option<String>,
    timeout_secs: u64,
}

impl Default for PoliteClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PoliteClientBuilder {
    /// Set a custom User-Agent. If not set, a browser-like default is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout in seconds. Default 10.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<PoliteClient, reqwest::Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(PoliteClient { inner })
    }
}
