//! Fetching and parsing: the document fetcher seam, the HTTP client, field extractors,
//! the article assembler, and the listing walker.

mod client;
mod error;

pub mod article;
pub mod extract;
pub mod listing;

pub use article::assemble_article;
pub use client::{PoliteClient, PoliteClientBuilder, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use error::ScraperError;
pub use listing::{ListingWalker, DEFAULT_SECTION_URL};

use reqwest::Url;
use scraper::Html;

/// Source of parsed documents. Implemented by [PoliteClient]; tests use an in-memory stub.
pub trait DocumentFetcher {
    fn fetch(&mut self, url: &str) -> Result<Html, ScraperError>;
}

/// Require an absolute http(s) URL with a host.
pub fn validate_section_url(input: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(input).map_err(|e| ScraperError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidUrl {
            input: input.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.host_str().is_none() {
        return Err(ScraperError::InvalidUrl {
            input: input.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(url)
}
