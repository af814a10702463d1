//! Output formats: CSV, JSON, and a plain-text report.
//! Each writer consumes the collected articles and overwrites one file.

use crate::model::{timestamp_format, ArticleRecord};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_CSV_FILE: &str = "vnexpress_articles.csv";
pub const DEFAULT_JSON_FILE: &str = "vnexpress_articles.json";
pub const DEFAULT_TEXT_FILE: &str = "vnexpress_articles_full.txt";

/// CSV header, in column order. Images and tags are JSON-only.
pub const CSV_COLUMNS: [&str; 10] = [
    "url",
    "title",
    "description",
    "author",
    "published_date",
    "category",
    "content_length",
    "views",
    "comments",
    "scraped_at",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Output format selector for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Text,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Text];
}

/// Errors from the format writers.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to write output: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

/// What a writer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    /// Nothing to write; the destination was left untouched.
    SkippedEmpty,
}

/// Create the destination's parent directory and open the file for writing.
fn create_output(path: &Path) -> Result<BufWriter<File>, FormatError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| FormatError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    let f = File::create(path).map_err(|e| FormatError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(f))
}

fn skip_if_empty(articles: &[ArticleRecord], path: &Path) -> bool {
    if articles.is_empty() {
        warn!(path = %path.display(), "no articles to save; skipping");
        return true;
    }
    false
}

#[derive(Serialize)]
struct CsvRow<'a> {
    url: &'a str,
    title: &'a str,
    description: &'a str,
    author: &'a str,
    published_date: &'a str,
    category: &'a str,
    content_length: usize,
    views: &'a str,
    comments: &'a str,
    scraped_at: String,
}

impl<'a> From<&'a ArticleRecord> for CsvRow<'a> {
    fn from(a: &'a ArticleRecord) -> Self {
        Self {
            url: &a.url,
            title: &a.title,
            description: &a.description,
            author: &a.author,
            published_date: &a.published_date,
            category: &a.category,
            content_length: a.content_length,
            views: &a.views,
            comments: &a.comments,
            scraped_at: a.scraped_at.format(timestamp_format::FORMAT).to_string(),
        }
    }
}

/// Write one row per article with the scalar columns of [CSV_COLUMNS].
///
/// The file starts with a UTF-8 byte order mark so spreadsheet apps detect the encoding.
pub fn write_csv(articles: &[ArticleRecord], path: &Path) -> Result<ExportOutcome, FormatError> {
    if skip_if_empty(articles, path) {
        return Ok(ExportOutcome::SkippedEmpty);
    }
    let mut out = create_output(path)?;
    out.write_all(UTF8_BOM)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    wtr.write_record(CSV_COLUMNS)?;
    for article in articles {
        wtr.serialize(CsvRow::from(article))?;
    }
    wtr.flush()?;
    info!(path = %path.display(), rows = articles.len(), "saved CSV");
    Ok(ExportOutcome::Written(path.to_path_buf()))
}

/// Write the whole collection, images and tags included, as one pretty-printed JSON array.
pub fn write_json(articles: &[ArticleRecord], path: &Path) -> Result<ExportOutcome, FormatError> {
    if skip_if_empty(articles, path) {
        return Ok(ExportOutcome::SkippedEmpty);
    }
    let mut out = create_output(path)?;
    serde_json::to_writer_pretty(&mut out, articles)?;
    writeln!(out)?;
    out.flush()?;
    info!(path = %path.display(), articles = articles.len(), "saved JSON");
    Ok(ExportOutcome::Written(path.to_path_buf()))
}

/// Write a human-readable block per article with its metadata and full content.
pub fn write_text(articles: &[ArticleRecord], path: &Path) -> Result<ExportOutcome, FormatError> {
    if skip_if_empty(articles, path) {
        return Ok(ExportOutcome::SkippedEmpty);
    }
    let mut f = create_output(path)?;
    let heavy = "=".repeat(80);
    let light = "-".repeat(80);

    for (i, a) in articles.iter().enumerate() {
        writeln!(f)?;
        writeln!(f, "{}", heavy)?;
        writeln!(f, "ARTICLE {}", i + 1)?;
        writeln!(f, "{}", heavy)?;
        writeln!(f)?;
        writeln!(f, "Title: {}", a.title)?;
        writeln!(f, "URL: {}", a.url)?;
        writeln!(f, "Author: {}", a.author)?;
        writeln!(f, "Published: {}", a.published_date)?;
        writeln!(f, "Category: {}", a.category)?;
        writeln!(f, "Tags: {}", a.joined_tags())?;
        writeln!(f)?;
        writeln!(f, "{}", light)?;
        writeln!(f, "Description:")?;
        writeln!(f, "{}", a.description)?;
        writeln!(f)?;
        writeln!(f, "{}", light)?;
        writeln!(f, "Full content:")?;
        writeln!(f, "{}", a.full_content)?;
        writeln!(f)?;
        writeln!(f, "{}", light)?;
        writeln!(f, "Views: {} | Comments: {}", a.views, a.comments)?;
    }
    f.flush()?;

    info!(path = %path.display(), articles = articles.len(), "saved full-content text");
    Ok(ExportOutcome::Written(path.to_path_buf()))
}

/// Dispatch to the writer for `format`.
pub fn write_format(
    format: OutputFormat,
    articles: &[ArticleRecord],
    path: &Path,
) -> Result<ExportOutcome, FormatError> {
    match format {
        OutputFormat::Csv => write_csv(articles, path),
        OutputFormat::Json => write_json(articles, path),
        OutputFormat::Text => write_text(articles, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::sample_article;
    use crate::model::NOT_FOUND;
    use std::io::Read;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("vnscrape_test_{}", std::process::id()))
            .join(name)
    }

    fn read(path: &Path) -> String {
        let mut buf = String::new();
        File::open(path).unwrap().read_to_string(&mut buf).unwrap();
        buf
    }

    #[test]
    fn csv_has_bom_fixed_header_and_scalar_columns_only() {
        let path = temp_path("articles.csv");
        let outcome = write_csv(&[sample_article()], &path).unwrap();
        assert_eq!(outcome, ExportOutcome::Written(path.clone()));
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(bytes.starts_with(UTF8_BOM));

        let mut rdr = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_COLUMNS.to_vec());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "https://vnexpress.net/loai-ech-moi-4800000.html");
        assert_eq!(&rows[0][1], "Phát hiện loài ếch mới");
        assert_eq!(&rows[0][8], NOT_FOUND);
        assert_eq!(&rows[0][9], "2024-05-06 09:30:15");
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains("ech.jpg"));
    }

    #[test]
    fn csv_quotes_multiline_and_comma_fields() {
        let mut a = sample_article();
        a.description = "Line one, with comma\nline two".to_string();
        let path = temp_path("quoted.csv");
        write_csv(&[a.clone()], &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let mut rdr = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[2], a.description);
    }

    #[test]
    fn json_round_trip_reproduces_every_field() {
        let mut second = sample_article();
        second.url = "https://vnexpress.net/other.html".to_string();
        second.images.clear();
        second.tags = (0..10).map(|i| format!("tag {}", i)).collect();
        let articles = vec![sample_article(), second];

        let path = temp_path("articles.json");
        write_json(&articles, &path).unwrap();
        let buf = read(&path);
        std::fs::remove_file(&path).ok();
        assert!(buf.trim_start().starts_with('['));
        assert!(buf.contains("Phát hiện loài ếch mới"), "non-ASCII kept verbatim");
        let parsed: Vec<ArticleRecord> = serde_json::from_str(&buf).unwrap();
        assert_eq!(parsed, articles);
    }

    #[test]
    fn text_report_has_block_per_article() {
        let mut untagged = sample_article();
        untagged.tags.clear();
        let path = temp_path("articles.txt");
        write_text(&[sample_article(), untagged], &path).unwrap();
        let buf = read(&path);
        std::fs::remove_file(&path).ok();
        assert!(buf.contains("ARTICLE 1"));
        assert!(buf.contains("ARTICLE 2"));
        assert!(buf.contains("Title: Phát hiện loài ếch mới"));
        assert!(buf.contains("Tags: sinh học, động vật"));
        assert!(buf.contains("Tags: N/A"));
        assert!(buf.contains("Full content:\nCác nhà khoa học phát hiện loài mới.\n\nNghiên cứu"));
        assert!(buf.contains("Views: 1.234 | Comments: N/A"));
        assert!(buf.contains(&"=".repeat(80)));
    }

    #[test]
    fn empty_collection_writes_nothing() {
        let dir = temp_path("empty_case");
        for format in OutputFormat::ALL {
            let path = dir.join("out.file");
            let outcome = write_format(format, &[], &path).unwrap();
            assert_eq!(outcome, ExportOutcome::SkippedEmpty);
            assert!(!path.exists());
        }
        assert!(!dir.exists());
    }

    #[test]
    fn writers_create_missing_directories_and_overwrite() {
        let path = temp_path("nested/deeper/articles.json");
        write_json(&[sample_article(), sample_article()], &path).unwrap();
        write_json(&[sample_article()], &path).unwrap();
        let parsed: Vec<ArticleRecord> = serde_json::from_str(&read(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn unwritable_destination_surfaces_error() {
        let blocker = temp_path("blocker_file");
        std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        std::fs::write(&blocker, "x").unwrap();
        let result = write_text(&[sample_article()], &blocker.join("out.txt"));
        std::fs::remove_file(&blocker).ok();
        assert!(matches!(result, Err(FormatError::Io { .. })));
    }
}
