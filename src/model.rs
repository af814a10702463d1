//! Canonical data model for scraped articles.
//!
//! The exporters and the article assembler use this as the single source of truth.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Marker stored in any text field whose value could not be extracted.
pub const NOT_FOUND: &str = "N/A";

/// Alt text recorded for images that carry no `alt` attribute.
pub const NO_ALT_TEXT: &str = "No description";

/// Owned copy of the sentinel, for struct fields.
pub fn not_found() -> String {
    NOT_FOUND.to_string()
}

/// One scraped article. Every field is always present; unknown text fields hold [NOT_FOUND].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Body blocks joined with a blank line.
    pub full_content: String,
    /// Character count of `full_content` at assembly time.
    pub content_length: usize,
    pub author: String,
    pub published_date: String,
    pub category: String,
    /// At most 5, in document order.
    pub images: Vec<ImageRef>,
    /// At most 10, in document order.
    pub tags: Vec<String>,
    /// Displayed counter text, not parsed.
    pub views: String,
    pub comments: String,
    #[serde(with = "timestamp_format")]
    pub scraped_at: NaiveDateTime,
}

impl ArticleRecord {
    /// Tags joined for display, or the sentinel when there are none.
    pub fn joined_tags(&self) -> String {
        if self.tags.is_empty() {
            not_found()
        } else {
            self.tags.join(", ")
        }
    }
}

/// An image found in the article: absolute URL plus alt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// `scraped_at` is written as local wall-clock time with whole seconds.
pub(crate) mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
