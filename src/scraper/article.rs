//! Article assembler: runs every field extractor once over a fetched page.

use crate::model::ArticleRecord;
use crate::scraper::extract::{
    extract_author, extract_category, extract_comments, extract_description,
    extract_full_content, extract_images, extract_published_date, extract_tags, extract_title,
    extract_views,
};
use chrono::{Local, SubsecRound};
use scraper::Html;

/// Build one record from a successfully fetched document and its source URL.
///
/// Misses in individual fields become sentinels; this never fails.
pub fn assemble_article(doc: &Html, url: &str) -> ArticleRecord {
    let full_content = extract_full_content(doc);
    ArticleRecord {
        url: url.to_string(),
        title: extract_title(doc),
        description: extract_description(doc),
        content_length: full_content.chars().count(),
        full_content,
        author: extract_author(doc),
        published_date: extract_published_date(doc),
        category: extract_category(doc),
        images: extract_images(doc, url),
        tags: extract_tags(doc),
        views: extract_views(doc),
        comments: extract_comments(doc),
        scraped_at: Local::now().naive_local().trunc_subsecs(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NOT_FOUND;

    const FULL_ARTICLE: &str = r#"<!DOCTYPE html><html><head>
<meta name="author" content="Meta Author">
<meta property="article:published_time" content="2024-05-06T08:00:00+07:00">
</head><body>
<ul class="breadcrumb"><li><a href="/">Trang chủ</a></li><li><a href="/khoa-hoc">Khoa học</a></li></ul>
<span class="date">Thứ hai, 6/5/2024, 08:00 (GMT+7)</span>
<h1 class="title-detail">Phát hiện loài ếch mới</h1>
<p class="description">Loài ếch nhỏ nhất từng được ghi nhận.</p>
<article class="fck_detail">
<p>Các nhà khoa học phát hiện loài mới.</p>
<figure><img src="/2024/05/06/ech.jpg" alt="Ếch"></figure>
<p></p>
<p>Nghiên cứu kéo dài ba năm.</p>
<p>Kết quả được công bố trên tạp chí.</p>
<p class="author_mail"><strong>Thu Thảo</strong></p>
</article>
<div class="tags"><a class="tag" href="/tag/1">sinh học</a><a class="tag" href="/tag/2">động vật</a></div>
<span class="view">1.234</span>
<span class="comment">56</span>
</body></html>"#;

    #[test]
    fn assembles_every_field() {
        let url = "https://vnexpress.net/loai-ech-moi-4800000.html";
        let record = assemble_article(&Html::parse_document(FULL_ARTICLE), url);
        assert_eq!(record.url, url);
        assert_eq!(record.title, "Phát hiện loài ếch mới");
        assert_eq!(record.description, "Loài ếch nhỏ nhất từng được ghi nhận.");
        assert_eq!(record.author, "Thu Thảo");
        assert_eq!(record.published_date, "Thứ hai, 6/5/2024, 08:00 (GMT+7)");
        assert_eq!(record.category, "Khoa học");
        assert_eq!(record.tags, vec!["sinh học", "động vật"]);
        assert_eq!(record.views, "1.234");
        assert_eq!(record.comments, "56");
        assert_eq!(record.images.len(), 1);
        assert_eq!(
            record.images[0].src,
            "https://vnexpress.net/2024/05/06/ech.jpg"
        );
        // Author line sits inside the body container and is a paragraph too.
        assert_eq!(
            record.full_content,
            "Các nhà khoa học phát hiện loài mới.\n\nNghiên cứu kéo dài ba năm.\n\nKết quả được công bố trên tạp chí.\n\nThu Thảo"
        );
    }

    #[test]
    fn content_length_counts_characters_not_bytes() {
        let record = assemble_article(
            &Html::parse_document(FULL_ARTICLE),
            "https://vnexpress.net/a.html",
        );
        assert_eq!(record.content_length, record.full_content.chars().count());
        assert!(record.content_length < record.full_content.len());
    }

    #[test]
    fn empty_document_yields_sentinels_everywhere() {
        let record = assemble_article(&Html::parse_document(""), "https://vnexpress.net/a.html");
        for field in [
            &record.title,
            &record.description,
            &record.full_content,
            &record.author,
            &record.published_date,
            &record.category,
            &record.views,
            &record.comments,
        ] {
            assert_eq!(field, NOT_FOUND);
        }
        assert_eq!(record.content_length, NOT_FOUND.len());
        assert!(record.images.is_empty());
        assert!(record.tags.is_empty());
    }

    #[test]
    fn scraped_at_has_whole_seconds() {
        use chrono::Timelike;
        let record = assemble_article(&Html::parse_document(""), "https://vnexpress.net/a.html");
        assert_eq!(record.scraped_at.nanosecond(), 0);
    }
}
