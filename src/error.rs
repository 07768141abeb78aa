use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Extraction failed for {url}: {reason}")]
    Extraction { url: String, reason: String },

    #[error("Database error: {0}")]
    Persistence(#[from] tokio_rusqlite::Error),

    #[error("Render failed for article {id}: {reason}")]
    Render { id: i64, reason: String },

    #[error("Article {0} not found")]
    NotFound(i64),

    #[error("Summary API error: {0}")]
    SummaryApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification front ends use to pick a message or status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Extraction,
    Persistence,
    Render,
    NotFound,
    Other,
}

impl AppError {
    pub fn extraction(url: &str, reason: impl ToString) -> Self {
        AppError::Extraction {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn render(id: i64, reason: impl ToString) -> Self {
        AppError::Render {
            id,
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Extraction { .. } | AppError::SummaryApi(_) | AppError::Http(_) => {
                ErrorKind::Extraction
            }
            AppError::Persistence(_) => ErrorKind::Persistence,
            AppError::Render { .. } => ErrorKind::Render,
            AppError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
