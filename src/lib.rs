//! vnscrape: CLI scraper for VnExpress news sections, outputting CSV, JSON, and text reports.

pub mod cli;
pub mod config;
pub mod crawl;
pub mod formats;
pub mod model;
pub mod scraper;
pub mod stats;
pub mod throttle;

// Re-exports for CLI and consumers.
pub use crawl::{CrawlOptions, CrawlOutcome, CrawlReport, Crawler};
pub use formats::{write_csv, write_json, write_text, ExportOutcome, FormatError, OutputFormat};
pub use model::{ArticleRecord, ImageRef, NOT_FOUND};
pub use scraper::{
    assemble_article, DocumentFetcher, ListingWalker, PoliteClient, PoliteClientBuilder,
    ScraperError,
};
pub use stats::CrawlStats;
pub use throttle::{FixedDelay, RateLimit, Unthrottled};
