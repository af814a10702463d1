//! Crawl driver: pages through the section listing, fetches and assembles each article, and
//! stops at the target count or when a listing page comes back empty.

use crate::model::ArticleRecord;
use crate::scraper::{assemble_article, DocumentFetcher, ListingWalker};
use crate::throttle::RateLimit;
use tracing::{debug, info, warn};

pub const DEFAULT_TARGET_COUNT: usize = 100;

/// Options for a crawl run.
pub struct CrawlOptions<'a> {
    /// Stop once this many articles are collected.
    pub target: usize,
    /// Called after each collected article with (collected, target).
    pub progress: Option<&'a dyn Fn(usize, usize)>,
}

impl Default for CrawlOptions<'_> {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET_COUNT,
            progress: None,
        }
    }
}

/// Why the crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    TargetReached,
    /// Listing page `page` was unavailable or had no articles.
    Exhausted { page: u32 },
}

/// An article that could not be fetched. Its URL is not retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    pub url: String,
    pub error: String,
}

/// Everything a crawl produced. `articles` is in collection order.
#[derive(Debug)]
pub struct CrawlReport {
    pub articles: Vec<ArticleRecord>,
    pub failures: Vec<CrawlFailure>,
    pub pages_visited: u32,
    pub outcome: CrawlOutcome,
}

/// Sequential crawler over one section.
pub struct Crawler<'a> {
    fetcher: &'a mut dyn DocumentFetcher,
    limiter: &'a mut dyn RateLimit,
    walker: ListingWalker,
}

impl<'a> Crawler<'a> {
    pub fn new(
        fetcher: &'a mut dyn DocumentFetcher,
        limiter: &'a mut dyn RateLimit,
        walker: ListingWalker,
    ) -> Self {
        Self {
            fetcher,
            limiter,
            walker,
        }
    }

    /// Run from page 1 until `options.target` articles are collected or the listing runs out.
    pub fn run(&mut self, options: &CrawlOptions<'_>) -> CrawlReport {
        let target = options.target;
        let mut articles: Vec<ArticleRecord> = Vec::with_capacity(target.min(1024));
        let mut failures = Vec::new();
        let mut pages_visited = 0u32;
        let mut page = 1u32;

        info!(target_count = target, section = self.walker.section_url(), "starting crawl");

        let outcome = loop {
            if articles.len() >= target {
                break CrawlOutcome::TargetReached;
            }

            info!(page, "processing listing page");
            let links = self.walker.article_links(&mut *self.fetcher, page);
            pages_visited += 1;
            if links.is_empty() {
                info!(page, collected = articles.len(), "no more articles found");
                break CrawlOutcome::Exhausted { page };
            }

            for link in links {
                if articles.len() >= target {
                    break;
                }
                debug!(
                    n = articles.len() + 1,
                    target_count = target,
                    url = %link,
                    "scraping article"
                );
                match self.fetcher.fetch(&link) {
                    Ok(doc) => {
                        let record = assemble_article(&doc, &link);
                        debug!(
                            url = %link,
                            content_length = record.content_length,
                            "article collected"
                        );
                        articles.push(record);
                        if let Some(ref p) = options.progress {
                            p(articles.len(), target);
                        }
                    }
                    Err(e) => {
                        warn!(url = %link, error = %e, "article skipped");
                        failures.push(CrawlFailure {
                            url: link,
                            error: e.to_string(),
                        });
                    }
                }
                self.limiter.after_article();
            }

            page += 1;
            if articles.len() < target {
                self.limiter.between_pages();
            }
        };

        info!(
            collected = articles.len(),
            failed = failures.len(),
            pages_visited,
            ?outcome,
            "crawl finished"
        );

        CrawlReport {
            articles,
            failures,
            pages_visited,
            outcome,
        }
    }
}
