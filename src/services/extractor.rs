//! URL to article extraction.
//!
//! Fetches a page, pulls title, lead image and readable text out of the
//! HTML, then hands the text to a [`Summarizer`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::ai::Summarizer;
use crate::error::{AppError, Result};
use crate::models::ExtractedArticle;

const USER_AGENT_STRING: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Column width handed to html2text; paragraphs are re-joined afterwards.
const TEXT_WIDTH: usize = 100;

#[async_trait]
pub trait Extractor: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ExtractedArticle>;
}

pub struct WebExtractor {
    client: Client,
    summarizer: Arc<dyn Summarizer>,
}

impl WebExtractor {
    pub fn new(timeout: Duration, summarizer: Arc<dyn Summarizer>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, summarizer })
    }
}

#[async_trait]
impl Extractor for WebExtractor {
    async fn fetch(&self, url: &str) -> Result<ExtractedArticle> {
        let page_url = parse_http_url(url)?;

        let response = self
            .client
            .get(page_url.clone())
            .send()
            .await
            .map_err(|e| AppError::extraction(url, e))?;

        if !response.status().is_success() {
            return Err(AppError::extraction(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::extraction(url, e))?;

        let page = parse_page(&html, &page_url);
        if page.content.is_empty() {
            return Err(AppError::extraction(url, "no readable content"));
        }
        tracing::debug!(title = %page.title, chars = page.content.len(), "Parsed page");

        let summary = self
            .summarizer
            .summarize(&page.title, &page.content)
            .await
            .map_err(|e| AppError::extraction(url, e))?;

        Ok(ExtractedArticle {
            title: page.title,
            content: page.content,
            summary,
            image_url: page.image_url,
        })
    }
}

fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| AppError::extraction(url, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AppError::extraction(
            url,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

#[derive(Debug)]
struct ParsedPage {
    title: String,
    content: String,
    image_url: Option<String>,
}

fn parse_page(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document).unwrap_or_else(|| page_url.to_string());
    let image_url = extract_image(&document, page_url);
    let content = extract_content(&document);

    ParsedPage {
        title,
        content,
        image_url,
    }
}

fn extract_title(document: &Html) -> Option<String> {
    extract_meta_content(document, "og:title")
        .or_else(|| extract_meta_content(document, "twitter:title"))
        .or_else(|| first_text(document, "title"))
        .or_else(|| first_text(document, "h1"))
}

fn extract_image(document: &Html, page_url: &Url) -> Option<String> {
    let raw = extract_meta_content(document, "og:image")
        .or_else(|| extract_meta_content(document, "twitter:image"))?;
    page_url.join(&raw).ok().map(|u| u.to_string())
}

/// Readable text of the most specific content container on the page.
fn extract_content(document: &Html) -> String {
    for container in ["article", "main", "body"] {
        let Ok(selector) = Selector::parse(container) else {
            continue;
        };
        let Some(element) = document.select(&selector).next() else {
            continue;
        };

        let inner = element.inner_html();
        let text = match html2text::from_read(inner.as_bytes(), TEXT_WIDTH) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!("Failed to convert {} to text: {}", container, e);
                continue;
            }
        };

        let cleaned = clean_text(&text);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }
    String::new()
}

/// Trim lines, re-join wrapped lines and keep one blank line between
/// paragraphs.
fn clean_text(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Content of a `<meta>` tag matched by `property` (Open Graph) or `name`.
fn extract_meta_content(document: &Html, key: &str) -> Option<String> {
    ["property", "name"].into_iter().find_map(|attr| {
        let selector = Selector::parse(&format!(r#"meta[{attr}="{key}"]"#)).ok()?;
        document
            .select(&selector)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
            .map(str::to_string)
    })
}
