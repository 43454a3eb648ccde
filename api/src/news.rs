//! Parsing of the championat.ru NBA news section: list pages into
//! article links, article pages into structured articles. Metadata
//! comes from the embedded JSON-LD block when present.

use crate::NewsArticle;
use crate::html;
use chrono::NaiveDateTime;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct NewsLink {
    pub id: u64,
    pub url: String,
}

/// Numeric article id out of a news URL ("...news-5512345...").
pub fn extract_news_id(url: &str) -> Option<u64> {
    let idx = url.find("news-")?;
    let digits: String = url[idx + "news-".len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Collect article links from a list page, deduped by id, skipping
/// comment anchors.
pub fn parse_index(page: &str, base_url: &str) -> Vec<NewsLink> {
    let mut links = Vec::new();
    let mut seen = std::collections::HashSet::new();

    let mut pos = 0;
    while let Some(idx) = page.get(pos..).and_then(|s| s.find("href=")) {
        let start = pos + idx + "href=".len();
        pos = start;
        let Some(quote) = page[start..].chars().next() else {
            break;
        };
        if quote != '"' && quote != '\'' {
            continue;
        }
        let value_start = start + 1;
        let Some(end) = page[value_start..].find(quote) else {
            break;
        };
        let href = &page[value_start..value_start + end];
        pos = value_start + end;

        if !href.contains("/basketball/news-") || href.contains("#comments") {
            continue;
        }
        let Some(id) = extract_news_id(href) else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{base_url}{href}")
        };
        links.push(NewsLink { id, url });
    }

    links
}

#[derive(Debug, Deserialize, Default)]
struct JsonLd {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    author: JsonLdAuthor,
    #[serde(rename = "datePublished", default)]
    date_published: String,
}

#[derive(Debug, Deserialize, Default)]
struct JsonLdAuthor {
    #[serde(default)]
    name: String,
}

/// Parse a full article page. Returns None when neither the JSON-LD
/// block nor the markup yields an id and title.
pub fn parse_article(page: &str, url: &str) -> Option<NewsArticle> {
    let id = extract_news_id(url)?;

    let schema = json_ld_block(page)
        .and_then(|raw| serde_json::from_str::<JsonLd>(raw).ok())
        .unwrap_or_default();

    let mut title = schema.headline;
    if title.is_empty() {
        title = h1_text(page).unwrap_or_default();
    }
    if title.is_empty() {
        return None;
    }

    // "2026-01-19T14:46:54+03:00" — drop the offset, keep naive local.
    let published_at = schema
        .date_published
        .get(..19)
        .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok());

    Some(NewsArticle {
        id,
        title,
        url: url.to_string(),
        body: article_body(page),
        author: schema.author.name,
        published_at,
        teams: Vec::new(),
    })
}

/// Contents of the `<script type="application/ld+json" class="js-schema">` block.
fn json_ld_block(page: &str) -> Option<&str> {
    let mut pos = 0;
    loop {
        let start = page.get(pos..)?.find("<script")? + pos;
        let head_end = page[start..].find('>')? + start;
        let head = &page[start..head_end];
        pos = head_end + 1;
        if !head.contains("application/ld+json") || !head.contains("js-schema") {
            continue;
        }
        let end = page[pos..].find("</script>")? + pos;
        return Some(page[pos..end].trim());
    }
}

fn h1_text(page: &str) -> Option<String> {
    let start = page.find("<h1")?;
    let content_start = page[start..].find('>')? + start + 1;
    let end = page[content_start..].find("</h1>")? + content_start;
    let text = html::strip_tags(&page[content_start..end]);
    if text.is_empty() { None } else { Some(text) }
}

/// Paragraph text of the article body div, ad banner blocks removed.
fn article_body(page: &str) -> String {
    let Some(body_start) = page.find(r#"id="articleBody""#) else {
        return String::new();
    };
    let open_start = page[..body_start].rfind("<div").unwrap_or(body_start);
    let Some(end) = html::element_end(page, "div", open_start) else {
        return String::new();
    };
    let body = &page[open_start..end];

    let mut paragraphs = Vec::new();
    let mut pos = 0;
    while let Some(p_start) = body.get(pos..).and_then(|s| s.find("<p")) {
        let start = pos + p_start;
        let Some(content_start) = body[start..].find('>').map(|i| start + i + 1) else {
            break;
        };
        let Some(p_end) = body[content_start..].find("</p>").map(|i| content_start + i) else {
            break;
        };
        // Skip paragraphs living inside banner wrappers.
        let preceding = &body[..start];
        let in_banner = preceding
            .rfind("banner")
            .is_some_and(|b| preceding[b..].matches("</div>").count() == 0);
        if !in_banner {
            let text = html::strip_tags(&body[content_start..p_end]);
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
        pos = p_end + "</p>".len();
    }

    paragraphs.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ids_from_urls() {
        assert_eq!(
            extract_news_id("/basketball/news-5512345-lebron-scores-30.html"),
            Some(5512345)
        );
        assert_eq!(extract_news_id("/basketball/article.html"), None);
    }

    #[test]
    fn index_dedupes_and_skips_comments() {
        let page = r#"
            <a href="/basketball/news-100-first.html">First</a>
            <a href="/basketball/news-100-first.html#comments">12</a>
            <a href="/basketball/news-100-first.html">First again</a>
            <a href="/basketball/news-200-second.html">Second</a>
            <a href="/football/news-300-wrong-sport.html">Wrong</a>
        "#;
        let links = parse_index(page, "https://example.com");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].id, 100);
        assert_eq!(links[0].url, "https://example.com/basketball/news-100-first.html");
        assert_eq!(links[1].id, 200);
    }

    const ARTICLE: &str = r#"
        <html><head>
        <script type="application/ld+json" class="js-schema">
        {"headline": "Дончич набрал 45 очков в матче с Бостоном",
         "author": {"name": "Иван Петров"},
         "datePublished": "2026-01-19T14:46:54+03:00"}
        </script>
        </head><body>
        <h1>fallback title</h1>
        <div class="article-content" id="articleBody">
            <p>Лука Дончич набрал 45 очков.</p>
            <div class="banner-inline"><p>Реклама</p></div>
            <p>Лейкерс выиграли в овертайме.</p>
        </div>
        </body></html>
    "#;

    #[test]
    fn article_prefers_json_ld_metadata() {
        let article =
            parse_article(ARTICLE, "https://example.com/basketball/news-42-donchich.html").unwrap();
        assert_eq!(article.id, 42);
        assert_eq!(article.title, "Дончич набрал 45 очков в матче с Бостоном");
        assert_eq!(article.author, "Иван Петров");
        assert_eq!(
            article.published_at.map(|d| d.format("%Y-%m-%d %H:%M").to_string()),
            Some("2026-01-19 14:46".to_string())
        );
    }

    #[test]
    fn body_drops_banner_paragraphs() {
        let article =
            parse_article(ARTICLE, "https://example.com/basketball/news-42-x.html").unwrap();
        assert!(article.body.contains("45 очков"));
        assert!(article.body.contains("овертайме"));
        assert!(!article.body.contains("Реклама"));
    }

    #[test]
    fn falls_back_to_h1_without_schema() {
        let page = r#"<html><h1>Plain title</h1><div id="articleBody"><p>Text.</p></div></html>"#;
        let article = parse_article(page, "/basketball/news-7-x.html").unwrap();
        assert_eq!(article.title, "Plain title");
        assert_eq!(article.body, "Text.");
    }

    #[test]
    fn article_without_title_is_rejected() {
        assert!(parse_article("<html></html>", "/basketball/news-9-x.html").is_none());
    }
}
