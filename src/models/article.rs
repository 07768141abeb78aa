use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields produced by an extractor for a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub image_url: Option<String>,
}

impl NewArticle {
    pub fn from_extracted(url: &str, extracted: ExtractedArticle) -> Self {
        Self {
            url: url.to_string(),
            title: extracted.title,
            content: extracted.content,
            summary: extracted.summary,
            image_url: extracted.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub url: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub image_url: Option<String>,
    /// `None` when the stored timestamp cannot be parsed.
    pub created_at: Option<DateTime<Utc>>,
}

/// One row of the article listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub summary: String,
}

/// Outcome of a successful add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedArticle {
    pub id: i64,
    pub title: String,
    pub category: String,
}
