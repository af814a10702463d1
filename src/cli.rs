//! CLI parsing and orchestration. Parses args, layers config, runs the crawl, then writes
//! CSV, JSON, and text outputs. Maps errors to exit codes.

use crate::config::{self, Config};
use crate::crawl::{CrawlOptions, CrawlOutcome, Crawler, DEFAULT_TARGET_COUNT};
use crate::formats::{
    write_format, ExportOutcome, FormatError, OutputFormat, DEFAULT_CSV_FILE, DEFAULT_JSON_FILE,
    DEFAULT_TEXT_FILE,
};
use crate::scraper::{
    validate_section_url, ListingWalker, PoliteClient, ScraperError, DEFAULT_SECTION_URL,
    DEFAULT_TIMEOUT_SECS,
};
use crate::stats::CrawlStats;
use crate::throttle::{FixedDelay, DEFAULT_ARTICLE_DELAY_SECS, DEFAULT_PAGE_DELAY_SECS};
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const DEFAULT_OUTPUT_DIR: &str = "data";

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Format(#[from] FormatError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Format(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "vnscrape")]
#[command(about = "Crawl a VnExpress news section and save articles as CSV, JSON, and text")]
#[command(
    after_help = "Config file keys (section_url, target_count, output_dir, csv_file, json_file, text_file, user_agent, timeout_secs, article_delay_secs, page_delay_secs) are read from ./vnscrape.toml or the user config dir. CLI flags override config."
)]
pub struct Args {
    /// Number of articles to collect (default 100).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Section listing URL (default https://vnexpress.net/khoa-hoc).
    #[arg(long)]
    pub section_url: Option<String>,

    /// Directory for output files (default ./data). Created if missing.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// CSV file name inside the output directory.
    #[arg(long)]
    pub csv_file: Option<String>,

    /// JSON file name inside the output directory.
    #[arg(long)]
    pub json_file: Option<String>,

    /// Text report file name inside the output directory.
    #[arg(long)]
    pub text_file: Option<String>,

    /// Formats to write, comma-separated: csv, json, text. Default: all three.
    #[arg(long = "format", value_delimiter = ',', value_parser = parse_format)]
    pub formats: Vec<OutputFormat>,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (overrides config; default 10).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Pause after each article in seconds (overrides config; default 1).
    #[arg(long)]
    pub delay: Option<u64>,

    /// Pause between listing pages in seconds (overrides config; default 2).
    #[arg(long)]
    pub page_delay: Option<u64>,

    /// Suppress progress output (warnings and errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging and verbose error chain.
    #[arg(long)]
    pub verbose: bool,

    /// Do not print the statistics summary.
    #[arg(long)]
    pub no_stats: bool,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s.trim().to_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        "json" => Ok(OutputFormat::Json),
        "text" | "txt" => Ok(OutputFormat::Text),
        _ => Err(format!(
            "Invalid --format value: '{}'. Use csv, json, or text.",
            s
        )),
    }
}

/// Effective settings after layering CLI flags over config over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub section_url: String,
    pub target: usize,
    pub output_dir: PathBuf,
    pub csv_file: String,
    pub json_file: String,
    pub text_file: String,
    pub formats: Vec<OutputFormat>,
    pub user_agent: Option<String>,
    pub timeout_secs: u64,
    pub article_delay_secs: u64,
    pub page_delay_secs: u64,
}

impl Settings {
    pub fn resolve(args: &Args, config: Option<&Config>) -> Self {
        let formats = if args.formats.is_empty() {
            OutputFormat::ALL.to_vec()
        } else {
            let mut f = Vec::with_capacity(args.formats.len());
            for format in &args.formats {
                if !f.contains(format) {
                    f.push(*format);
                }
            }
            f
        };
        Self {
            section_url: args
                .section_url
                .clone()
                .or_else(|| config.and_then(|c| c.section_url.clone()))
                .unwrap_or_else(|| DEFAULT_SECTION_URL.to_string()),
            target: args
                .count
                .or_else(|| config.and_then(|c| c.target_count))
                .unwrap_or(DEFAULT_TARGET_COUNT),
            output_dir: args
                .output_dir
                .clone()
                .or_else(|| config.and_then(|c| c.output_dir.clone()))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            csv_file: args
                .csv_file
                .clone()
                .or_else(|| config.and_then(|c| c.csv_file.clone()))
                .unwrap_or_else(|| DEFAULT_CSV_FILE.to_string()),
            json_file: args
                .json_file
                .clone()
                .or_else(|| config.and_then(|c| c.json_file.clone()))
                .unwrap_or_else(|| DEFAULT_JSON_FILE.to_string()),
            text_file: args
                .text_file
                .clone()
                .or_else(|| config.and_then(|c| c.text_file.clone()))
                .unwrap_or_else(|| DEFAULT_TEXT_FILE.to_string()),
            formats,
            user_agent: args
                .user_agent
                .clone()
                .or_else(|| config.and_then(|c| c.user_agent.clone())),
            timeout_secs: args
                .timeout
                .or_else(|| config.and_then(|c| c.timeout_secs))
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            article_delay_secs: args
                .delay
                .or_else(|| config.and_then(|c| c.article_delay_secs))
                .unwrap_or(DEFAULT_ARTICLE_DELAY_SECS),
            page_delay_secs: args
                .page_delay
                .or_else(|| config.and_then(|c| c.page_delay_secs))
                .unwrap_or(DEFAULT_PAGE_DELAY_SECS),
        }
    }

    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        let name = match format {
            OutputFormat::Csv => &self.csv_file,
            OutputFormat::Json => &self.json_file,
            OutputFormat::Text => &self.text_file,
        };
        self.output_dir.join(name)
    }
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config().map_err(CliRunError::InvalidInput)?;
    let settings = Settings::resolve(args, config.as_ref());

    validate_section_url(&settings.section_url).map_err(|e| match e {
        ScraperError::InvalidUrl { input, reason } => CliRunError::InvalidInput(format!(
            "Expected a section URL, e.g. {}. Invalid: {}: {}",
            DEFAULT_SECTION_URL, input, reason
        )),
        other => CliRunError::InvalidInput(other.to_string()),
    })?;

    let mut builder = PoliteClient::builder().timeout_secs(settings.timeout_secs);
    if let Some(ref ua) = settings.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    let mut client = builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))?;
    let mut limiter = FixedDelay::from_secs(settings.article_delay_secs, settings.page_delay_secs);

    let progress_state: RefCell<Option<indicatif::ProgressBar>> = RefCell::new(None);
    let progress_cb = |n: usize, total: usize| {
        if total == 0 {
            return;
        }
        let mut state = progress_state.borrow_mut();
        let pb = state.get_or_insert_with(|| {
            let bar = indicatif::ProgressBar::new(total as u64);
            if let Ok(style) = indicatif::ProgressStyle::default_bar()
                .template("{spinner} {msg} [{bar:40}] {pos}/{len} ({elapsed})")
            {
                bar.set_style(
                    style
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                        .progress_chars("█▉▊▋▌▍▎▏ "),
                );
            }
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        pb.set_position(n as u64);
        pb.set_message(format!("Collected {}/{}", n, total));
    };
    let progress: Option<&dyn Fn(usize, usize)> = if args.quiet { None } else { Some(&progress_cb) };

    let report = {
        let mut crawler = Crawler::new(
            &mut client,
            &mut limiter,
            ListingWalker::new(settings.section_url.clone()),
        );
        crawler.run(&CrawlOptions {
            target: settings.target,
            progress,
        })
    };

    if let Some(pb) = progress_state.borrow_mut().take() {
        pb.disable_steady_tick();
        pb.finish_and_clear();
    }

    if let CrawlOutcome::Exhausted { page } = report.outcome {
        if report.articles.len() < settings.target {
            info!(
                page,
                collected = report.articles.len(),
                target_count = settings.target,
                "section exhausted before reaching target"
            );
        }
    }

    for format in &settings.formats {
        let path = settings.output_path(*format);
        if let ExportOutcome::Written(p) = write_format(*format, &report.articles, &path)? {
            if !args.quiet {
                eprintln!("Wrote {}", p.display());
            }
        }
    }

    if !args.quiet && !args.no_stats {
        match CrawlStats::from_articles(&report.articles) {
            Some(stats) => eprintln!("{}", stats),
            None => eprintln!("No articles collected."),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["vnscrape"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults_without_config() {
        let s = Settings::resolve(&args(&[]), None);
        assert_eq!(s.section_url, DEFAULT_SECTION_URL);
        assert_eq!(s.target, 100);
        assert_eq!(s.output_dir, PathBuf::from("data"));
        assert_eq!(s.formats, OutputFormat::ALL.to_vec());
        assert_eq!(s.timeout_secs, 10);
        assert_eq!(s.article_delay_secs, 1);
        assert_eq!(s.page_delay_secs, 2);
        assert!(s.user_agent.is_none());
        assert_eq!(
            s.output_path(OutputFormat::Csv),
            PathBuf::from("data/vnexpress_articles.csv")
        );
        assert_eq!(
            s.output_path(OutputFormat::Text),
            PathBuf::from("data/vnexpress_articles_full.txt")
        );
    }

    #[test]
    fn config_overrides_defaults_and_cli_overrides_config() {
        let config = Config {
            target_count: Some(20),
            output_dir: Some(PathBuf::from("cfg_out")),
            json_file: Some("cfg.json".to_string()),
            page_delay_secs: Some(7),
            ..Config::default()
        };
        let s = Settings::resolve(&args(&["-n", "5", "--page-delay", "0"]), Some(&config));
        assert_eq!(s.target, 5);
        assert_eq!(s.page_delay_secs, 0);
        assert_eq!(s.output_dir, PathBuf::from("cfg_out"));
        assert_eq!(s.output_path(OutputFormat::Json), PathBuf::from("cfg_out/cfg.json"));
    }

    #[test]
    fn format_subset_is_deduplicated_in_order() {
        let s = Settings::resolve(&args(&["--format", "json,csv", "--format", "json"]), None);
        assert_eq!(s.formats, vec![OutputFormat::Json, OutputFormat::Csv]);
    }

    #[test]
    fn parse_format_all() {
        assert_eq!(parse_format("csv").unwrap(), OutputFormat::Csv);
        assert_eq!(parse_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_format("text").unwrap(), OutputFormat::Text);
        assert_eq!(parse_format("txt").unwrap(), OutputFormat::Text);
        assert!(parse_format("xml").is_err());
    }

    #[test]
    fn invalid_format_flag_is_rejected() {
        assert!(Args::try_parse_from(["vnscrape", "--format", "pdf"]).is_err());
    }

    #[test]
    fn cli_run_error_exit_codes() {
        assert_eq!(CliRunError::InvalidInput("x".into()).exit_code(), 1);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(CliRunError::Format(FormatError::Write(io)).exit_code(), 3);
    }
}
