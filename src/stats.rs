//! Summary statistics over a crawl's collected articles.

use crate::model::ArticleRecord;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStats {
    pub articles: usize,
    pub total_chars: usize,
    /// Rounded to the nearest character.
    pub average_chars: usize,
    pub shortest: usize,
    pub longest: usize,
    pub first_title: String,
    pub last_title: String,
}

impl CrawlStats {
    /// `None` for an empty collection.
    pub fn from_articles(articles: &[ArticleRecord]) -> Option<Self> {
        let first = articles.first()?;
        let last = articles.last()?;
        let lengths = articles.iter().map(|a| a.content_length);
        let total_chars: usize = lengths.clone().sum();
        let count = articles.len();
        Some(Self {
            articles: count,
            total_chars,
            average_chars: (total_chars + count / 2) / count,
            shortest: lengths.clone().min().unwrap_or(0),
            longest: lengths.max().unwrap_or(0),
            first_title: first.title.clone(),
            last_title: last.title.clone(),
        })
    }
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "CRAWL STATISTICS")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Articles: {}", self.articles)?;
        writeln!(f, "Total content characters: {}", group_thousands(self.total_chars))?;
        writeln!(f, "Average characters/article: {}", group_thousands(self.average_chars))?;
        writeln!(f, "Shortest article: {} characters", self.shortest)?;
        writeln!(f, "Longest article: {} characters", self.longest)?;
        writeln!(f)?;
        writeln!(f, "First article:")?;
        writeln!(f, "  - {}", self.first_title)?;
        writeln!(f)?;
        writeln!(f, "Last article:")?;
        writeln!(f, "  - {}", self.last_title)?;
        write!(f, "{}", rule)
    }
}

/// 1234567 -> "1,234,567"
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
