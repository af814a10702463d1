//! Field extractors for article pages.
//!
//! Each scalar field is resolved by an ordered list of [Strategy] functions; the first one that
//! yields non-empty trimmed text wins, otherwise the field gets [NOT_FOUND](crate::model::NOT_FOUND).
//! Extractors are independent of each other and never fail: a selector that does not parse or
//! an element that is missing is simply a miss.

use crate::model::{not_found, ImageRef, NO_ALT_TEXT};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub const MAX_IMAGES: usize = 5;
pub const MAX_TAGS: usize = 10;
/// Fallback body paragraphs must be longer than this many characters.
pub const MIN_FALLBACK_PARAGRAPH_CHARS: usize = 20;
pub const CONTENT_SEPARATOR: &str = "\n\n";

/// One way of locating a field in a document.
pub type Strategy = fn(&Html) -> Option<String>;

/// Evaluate strategies in order and return the first present value.
pub fn first_present(doc: &Html, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(doc))
}

fn resolve(doc: &Html, field: &str, strategies: &[Strategy]) -> String {
    first_present(doc, strategies).unwrap_or_else(|| {
        debug!(field, "field not found");
        not_found()
    })
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Element text concatenated and trimmed; `None` when nothing is left.
pub(crate) fn element_text(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    doc.select(&sel).next().and_then(element_text)
}

fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    let sel = selector(css)?;
    doc.select(&sel)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn title_heading(doc: &Html) -> Option<String> {
    first_text(doc, "h1.title-detail")
}

fn description_paragraph(doc: &Html) -> Option<String> {
    first_text(doc, "p.description")
}

fn author_contact(doc: &Html) -> Option<String> {
    first_text(doc, "p.author_mail")
}

fn author_meta(doc: &Html) -> Option<String> {
    first_attr(doc, r#"meta[name="author"]"#, "content")
}

fn date_display(doc: &Html) -> Option<String> {
    first_text(doc, "span.date")
}

fn date_meta(doc: &Html) -> Option<String> {
    first_attr(doc, r#"meta[property="article:published_time"]"#, "content")
}

/// Second breadcrumb entry; the first is the site root.
fn breadcrumb_section(doc: &Html) -> Option<String> {
    let list_sel = selector("ul.breadcrumb")?;
    let item_sel = selector("li")?;
    let list = doc.select(&list_sel).next()?;
    list.select(&item_sel).nth(1).and_then(element_text)
}

fn view_counter(doc: &Html) -> Option<String> {
    first_text(doc, "span.view")
}

fn comment_counter(doc: &Html) -> Option<String> {
    first_text(doc, "span.comment")
}

pub fn extract_title(doc: &Html) -> String {
    resolve(doc, "title", &[title_heading])
}

pub fn extract_description(doc: &Html) -> String {
    resolve(doc, "description", &[description_paragraph])
}

pub fn extract_author(doc: &Html) -> String {
    resolve(doc, "author", &[author_contact, author_meta])
}

pub fn extract_published_date(doc: &Html) -> String {
    resolve(doc, "published_date", &[date_display, date_meta])
}

pub fn extract_category(doc: &Html) -> String {
    resolve(doc, "category", &[breadcrumb_section])
}

pub fn extract_views(doc: &Html) -> String {
    resolve(doc, "views", &[view_counter])
}

pub fn extract_comments(doc: &Html) -> String {
    resolve(doc, "comments", &[comment_counter])
}

/// Paragraphs, sub-headings and quotes of the dedicated article body, in document order.
fn detail_body_blocks(doc: &Html) -> Vec<String> {
    let (Some(body_sel), Some(block_sel)) = (
        selector("article.fck_detail"),
        selector("p, h2, h3, blockquote"),
    ) else {
        return Vec::new();
    };
    match doc.select(&body_sel).next() {
        Some(body) => body.select(&block_sel).filter_map(element_text).collect(),
        None => Vec::new(),
    }
}

/// Long paragraphs of the first generic `article` element.
fn generic_article_paragraphs(doc: &Html) -> Vec<String> {
    let (Some(article_sel), Some(p_sel)) = (selector("article"), selector("p")) else {
        return Vec::new();
    };
    match doc.select(&article_sel).next() {
        Some(article) => article
            .select(&p_sel)
            .filter_map(element_text)
            .filter(|t| t.chars().count() > MIN_FALLBACK_PARAGRAPH_CHARS)
            .collect(),
        None => Vec::new(),
    }
}

/// Body text blocks joined with a blank line, or the sentinel when no block was found.
pub fn extract_full_content(doc: &Html) -> String {
    let mut blocks = detail_body_blocks(doc);
    if blocks.is_empty() {
        blocks = generic_article_paragraphs(doc);
        if !blocks.is_empty() {
            debug!(blocks = blocks.len(), "body taken from generic article fallback");
        }
    }
    if blocks.is_empty() {
        debug!(field = "full_content", "field not found");
        return not_found();
    }
    blocks.join(CONTENT_SEPARATOR)
}

/// Make an image source absolute against the article URL. Sources that already parse as a
/// URL are kept as-is; anything else is joined onto `base`.
pub fn absolutize(src: &str, base: &str) -> Option<String> {
    if Url::parse(src).is_ok() {
        return Some(src.to_string());
    }
    let base = Url::parse(base).ok()?;
    base.join(src).ok().map(|u| u.to_string())
}

/// First [MAX_IMAGES] `img` elements with a non-empty `src`, resolved against `page_url`.
pub fn extract_images(doc: &Html, page_url: &str) -> Vec<ImageRef> {
    let Some(img_sel) = selector("img") else {
        return Vec::new();
    };
    doc.select(&img_sel)
        .take(MAX_IMAGES)
        .filter_map(|img| {
            let src = img.value().attr("src").map(str::trim).unwrap_or_default();
            if src.is_empty() {
                return None;
            }
            let Some(src) = absolutize(src, page_url) else {
                debug!(src, page_url, "dropping image with unresolvable src");
                return None;
            };
            let alt = img.value().attr("alt").unwrap_or(NO_ALT_TEXT).to_string();
            Some(ImageRef { src, alt })
        })
        .collect()
}

/// Text of the first [MAX_TAGS] tag links, skipping empty ones.
pub fn extract_tags(doc: &Html) -> Vec<String> {
    let Some(tag_sel) = selector("a.tag") else {
        return Vec::new();
    };
    doc.select(&tag_sel)
        .take(MAX_TAGS)
        .filter_map(element_text)
        .collect()
}
