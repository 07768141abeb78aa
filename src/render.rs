//! Static HTML artifacts for archived articles.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::{Article, UNCATEGORIZED};

/// Exactly the fields an artifact shows, decoupled from the store row.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub category: String,
    pub summary: String,
    pub content: String,
    pub image_url: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl From<&Article> for ArticleView {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            url: article.url.clone(),
            title: article.title.clone(),
            category: article
                .category_name
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            summary: article.summary.clone(),
            content: article.content.clone(),
            image_url: article.image_url.clone(),
            saved_at: article.created_at,
        }
    }
}

pub trait Renderer: Send + Sync {
    fn render(&self, view: &ArticleView) -> Result<String>;
}

/// Location of the artifact for article `id` under `articles_dir`.
pub fn artifact_path(articles_dir: &Path, id: i64) -> PathBuf {
    articles_dir.join(format!("{id}.html"))
}

const STYLE: &str = r#"
    body { max-width: 42rem; margin: 2rem auto; padding: 0 1rem;
           font-family: Georgia, serif; line-height: 1.6; color: #222; }
    header .category, header .saved { text-transform: uppercase; font-size: 0.8rem; color: #777; }
    .summary { background: #f5f5f0; border-left: 4px solid #bbb; padding: 0.5rem 1rem; }
    img.cover { max-width: 100%; height: auto; }
    footer { margin-top: 3rem; font-size: 0.9rem; }
"#;

/// Built-in standalone HTML5 renderer.
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, view: &ArticleView) -> Result<String> {
        let mut out = String::with_capacity(view.content.len() + 2048);
        let title = escape_html(&view.title);

        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<article>\n\
             <header>\n<p class=\"category\">{category}</p>\n<h1>{title}</h1>\n",
            category = escape_html(&view.category),
        );
        if let Some(saved_at) = view.saved_at {
            let _ = writeln!(
                out,
                "<p class=\"saved\">Saved <time datetime=\"{}\">{}</time></p>",
                saved_at.to_rfc3339(),
                saved_at.format("%Y-%m-%d")
            );
        }
        out.push_str("</header>\n");

        if let Some(image_url) = &view.image_url {
            let _ = writeln!(
                out,
                "<img class=\"cover\" src=\"{}\" alt=\"\">",
                escape_html(image_url)
            );
        }

        if !view.summary.is_empty() {
            let _ = writeln!(
                out,
                "<section class=\"summary\"><p>{}</p></section>",
                escape_html(&view.summary)
            );
        }

        out.push_str("<section class=\"content\">\n");
        for paragraph in paragraphs(&view.content) {
            let _ = writeln!(out, "<p>{}</p>", escape_html(&paragraph));
        }
        out.push_str("</section>\n");

        let url = escape_html(&view.url);
        let _ = write!(
            out,
            "<footer><a href=\"{url}\">{url}</a></footer>\n</article>\n</body>\n</html>\n"
        );

        Ok(out)
    }
}

fn paragraphs(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .map(|p| {
            p.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| !p.is_empty())
        .collect()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
