//! Request pacing. The crawl driver only talks to [RateLimit], so the sleeping policy can be
//! swapped without touching the crawl loop.

use std::time::Duration;
use tracing::trace;

pub const DEFAULT_ARTICLE_DELAY_SECS: u64 = 1;
pub const DEFAULT_PAGE_DELAY_SECS: u64 = 2;

/// Pacing hooks called by the crawl driver.
pub trait RateLimit {
    /// Called after every article attempt, successful or not.
    fn after_article(&mut self);
    /// Called before moving on to the next listing page.
    fn between_pages(&mut self);
}

/// Blocking fixed sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    pub article: Duration,
    pub page: Duration,
}

impl FixedDelay {
    pub fn from_secs(article_secs: u64, page_secs: u64) -> Self {
        Self {
            article: Duration::from_secs(article_secs),
            page: Duration::from_secs(page_secs),
        }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::from_secs(DEFAULT_ARTICLE_DELAY_SECS, DEFAULT_PAGE_DELAY_SECS)
    }
}

impl RateLimit for FixedDelay {
    fn after_article(&mut self) {
        trace!(delay_ms = self.article.as_millis() as u64, "article pause");
        std::thread::sleep(self.article);
    }

    fn between_pages(&mut self) {
        trace!(delay_ms = self.page.as_millis() as u64, "page pause");
        std::thread::sleep(self.page);
    }
}

/// No pacing at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

impl RateLimit for Unthrottled {
    fn after_article(&mut self) {}
    fn between_pages(&mut self) {}
}
