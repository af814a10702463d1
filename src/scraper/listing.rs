//! Listing walker: turns a section page number into the article URLs listed on it.

use crate::scraper::DocumentFetcher;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

pub const DEFAULT_SECTION_URL: &str = "https://vnexpress.net/khoa-hoc";

/// Walks the numbered listing pages of one news section.
#[derive(Debug, Clone)]
pub struct ListingWalker {
    section_url: String,
}

impl ListingWalker {
    pub fn new(section_url: impl Into<String>) -> Self {
        let section_url = section_url.into();
        Self {
            section_url: section_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn section_url(&self) -> &str {
        &self.section_url
    }

    /// Page 1 is the bare section URL; later pages append `-p{N}`.
    pub fn page_url(&self, page: u32) -> String {
        if page > 1 {
            format!("{}-p{}", self.section_url, page)
        } else {
            self.section_url.clone()
        }
    }

    /// Article URLs on `page`, in document order.
    ///
    /// A failed fetch and a page without listing items both return an empty list; the caller
    /// treats either as the end of the section.
    pub fn article_links(&self, fetcher: &mut dyn DocumentFetcher, page: u32) -> Vec<String> {
        let url = self.page_url(page);
        match fetcher.fetch(&url) {
            Ok(doc) => {
                let links = parse_listing(&doc, &url);
                if links.is_empty() {
                    info!(page, %url, "listing page has no articles");
                } else {
                    debug!(page, count = links.len(), "listing page parsed");
                }
                links
            }
            Err(e) => {
                warn!(page, %url, error = %e, "could not fetch listing page");
                Vec::new()
            }
        }
    }
}

impl Default for ListingWalker {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_URL)
    }
}

/// First link of every `article.item-news`, resolved against the listing page URL.
pub fn parse_listing(doc: &Html, page_url: &str) -> Vec<String> {
    let (Ok(item_sel), Ok(link_sel)) = (
        Selector::parse("article.item-news"),
        Selector::parse("a[href]"),
    ) else {
        return Vec::new();
    };
    let base = Url::parse(page_url).ok();
    doc.select(&item_sel)
        .filter_map(|item| item.select(&link_sel).next())
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| match base.as_ref().and_then(|b| b.join(href).ok()) {
            Some(resolved) => resolved.to_string(),
            None => href.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::tests::StubFetcher;

    const LISTING: &str = r#"<html><body>
<article class="item-news"><h3><a href="https://vnexpress.net/bai-1-1.html">Bài 1</a></h3></article>
<article class="item-news"><div class="thumb"><a href="/bai-2-2.html"><img src="x.jpg"></a></div><h3><a href="/other.html">Bài 2</a></h3></article>
<article class="item-news"><p>No link here</p></article>
<article class="item-news-ads"><a href="https://ads.example.com">Ad</a></article>
<article class="item-news"><a href="https://vnexpress.net/bai-3-3.html">Bài 3</a></article>
</body></html>"#;

    #[test]
    fn page_urls() {
        let walker = ListingWalker::new("https://vnexpress.net/khoa-hoc/");
        assert_eq!(walker.page_url(1), "https://vnexpress.net/khoa-hoc");
        assert_eq!(walker.page_url(0), "https://vnexpress.net/khoa-hoc");
        assert_eq!(walker.page_url(2), "https://vnexpress.net/khoa-hoc-p2");
        assert_eq!(walker.page_url(17), "https://vnexpress.net/khoa-hoc-p17");
    }

    #[test]
    fn parse_listing_takes_first_link_per_item_in_order() {
        let doc = Html::parse_document(LISTING);
        let links = parse_listing(&doc, "https://vnexpress.net/khoa-hoc");
        assert_eq!(
            links,
            vec![
                "https://vnexpress.net/bai-1-1.html",
                "https://vnexpress.net/bai-2-2.html",
                "https://vnexpress.net/bai-3-3.html",
            ]
        );
    }

    #[test]
    fn page_without_items_is_empty() {
        let mut fetcher = StubFetcher::default().with_page(
            "https://vnexpress.net/khoa-hoc-p9",
            "<html><body><p>Nothing</p></body></html>",
        );
        let walker = ListingWalker::default();
        assert!(walker.article_links(&mut fetcher, 9).is_empty());
    }

    #[test]
    fn fetch_failure_is_empty() {
        let mut fetcher = StubFetcher::default();
        let walker = ListingWalker::default();
        assert!(walker.article_links(&mut fetcher, 1).is_empty());
        assert_eq!(fetcher.requests, vec!["https://vnexpress.net/khoa-hoc"]);
    }

    #[test]
    fn article_links_fetches_numbered_page() {
        let mut fetcher =
            StubFetcher::default().with_page("https://vnexpress.net/khoa-hoc-p2", LISTING);
        let links = ListingWalker::default().article_links(&mut fetcher, 2);
        assert_eq!(links.len(), 3);
    }
}
