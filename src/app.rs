use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::ai::{ClaudeSummarizer, ExtractiveSummarizer, Summarizer};
use crate::archiver::Archiver;
use crate::cli::Command;
use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, ErrorKind, Result};
use crate::render::HtmlRenderer;
use crate::server;
use crate::services::WebExtractor;

const SUMMARY_WIDTH: usize = 80;

pub struct App {
    config: Config,
    archiver: Arc<Archiver>,
}

impl App {
    pub async fn new(config: Config) -> Result<Self> {
        let repository = Repository::new(&config.db_path).await?;

        let summarizer: Arc<dyn Summarizer> = match &config.claude_api_key {
            Some(key) => Arc::new(ClaudeSummarizer::new(key.clone())?),
            None => Arc::new(ExtractiveSummarizer::new(config.summary_sentences)),
        };
        tracing::debug!(summarizer = summarizer.name(), "Using summarizer");

        let extractor =
            WebExtractor::new(Duration::from_secs(config.fetch_timeout_secs), summarizer)?;

        let archiver = Archiver::new(
            repository,
            Box::new(extractor),
            Box::new(HtmlRenderer),
            config.articles_dir.clone(),
        );

        Ok(Self::with_archiver(config, archiver))
    }

    pub fn with_archiver(config: Config, archiver: Archiver) -> Self {
        Self {
            config,
            archiver: Arc::new(archiver),
        }
    }

    /// Run one CLI command, writing user-facing output to `out`.
    pub async fn handle_command<W: Write>(&self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Add { url, category } => {
                let category = category.unwrap_or_else(|| self.config.default_category.clone());
                let added = self.archiver.add(&url, &category).await?;
                writeln!(
                    out,
                    "Article saved successfully! ID: {}, Title: {}, Category: {}",
                    added.id, added.title, added.category
                )?;
            }

            Command::List => {
                let articles = self.archiver.list().await?;
                if articles.is_empty() {
                    writeln!(out, "No articles found.")?;
                }
                for a in articles {
                    let summary = textwrap::fill(
                        &format!("Summary: {}", a.summary),
                        textwrap::Options::new(SUMMARY_WIDTH).subsequent_indent("         "),
                    );
                    writeln!(
                        out,
                        "ID: {} | {}\nCategory: {}\n{}\n---",
                        a.id, a.title, a.category, summary
                    )?;
                }
            }

            Command::Read { id, no_open } => {
                let path = self.archiver.read(id).await?;
                if no_open {
                    writeln!(out, "{}", path.display())?;
                } else {
                    open::that(&path)?;
                    writeln!(out, "Opened article ID {}", id)?;
                }
            }

            Command::Rerender { id } => {
                let path = self.archiver.rerender(id).await?;
                writeln!(out, "Rendered article ID {} to {}", id, path.display())?;
            }

            Command::Categories => {
                let categories = self.archiver.categories().await?;
                if categories.is_empty() {
                    writeln!(out, "No categories found.")?;
                }
                for c in categories {
                    writeln!(out, "{} ({})", c.name, c.article_count)?;
                }
            }

            Command::Serve { addr } => {
                let addr = addr.unwrap_or_else(|| self.config.listen_addr.clone());
                server::serve(
                    Arc::clone(&self.archiver),
                    &addr,
                    self.config.default_category.clone(),
                )
                .await?;
            }
        }

        Ok(())
    }
}

/// Generic line shown to the user when `command` fails with `err`.
pub fn failure_message(command: &Command, err: &AppError) -> &'static str {
    match (command, err.kind()) {
        (_, ErrorKind::NotFound) => "Article not found.",
        (Command::Add { .. }, ErrorKind::Render) => {
            "Article saved, but its archived copy could not be written. Try `rerender`."
        }
        (_, ErrorKind::Persistence) => "A database error occurred.",
        (Command::Add { .. }, _) => "An error occurred while adding the article.",
        (Command::List, _) => "An error occurred while listing articles.",
        (Command::Read { .. }, _) => "An error occurred while reading the article.",
        (Command::Rerender { .. }, _) => "An error occurred while rendering the article.",
        (Command::Categories, _) => "An error occurred while listing categories.",
        (Command::Serve { .. }, _) => "An error occurred while running the server.",
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tempfile::tempdir;

    use super::*;
    use crate::models::ExtractedArticle;
    use crate::services::Extractor;

    struct OnePage;

    #[async_trait]
    impl Extractor for OnePage {
        async fn fetch(&self, url: &str) -> Result<ExtractedArticle> {
            if url != "https://example.com/a" {
                return Err(AppError::extraction(url, "unreachable"));
            }
            Ok(ExtractedArticle {
                title: "A".to_string(),
                content: "Body.".to_string(),
                summary: "S".to_string(),
                image_url: None,
            })
        }
    }

    async fn app_in(dir: &std::path::Path) -> App {
        let config = Config {
            articles_dir: dir.join("articles"),
            ..Config::default()
        };
        let repository = Repository::open_in_memory().await.unwrap();
        let archiver = Archiver::new(
            repository,
            Box::new(OnePage),
            Box::new(HtmlRenderer),
            config.articles_dir.clone(),
        );
        App::with_archiver(config, archiver)
    }

    async fn run(app: &App, command: Command) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = app.handle_command(command, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn add_uses_default_category() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path()).await;

        let (result, out) = run(
            &app,
            Command::Add {
                url: "https://example.com/a".to_string(),
                category: None,
            },
        )
        .await;

        result.unwrap();
        assert_eq!(
            out,
            "Article saved successfully! ID: 1, Title: A, Category: General\n"
        );
    }

    #[tokio::test]
    async fn list_reports_empty_store() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path()).await;

        let (result, out) = run(&app, Command::List).await;

        result.unwrap();
        assert_eq!(out, "No articles found.\n");
    }

    #[tokio::test]
    async fn list_prints_each_article() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path()).await;
        let add = Command::Add {
            url: "https://example.com/a".to_string(),
            category: Some("Tech".to_string()),
        };
        run(&app, add).await.0.unwrap();

        let (result, out) = run(&app, Command::List).await;

        result.unwrap();
        assert_eq!(out, "ID: 1 | A\nCategory: Tech\nSummary: S\n---\n");
    }

    #[tokio::test]
    async fn read_without_opening_prints_path() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path()).await;
        let add = Command::Add {
            url: "https://example.com/a".to_string(),
            category: None,
        };
        run(&app, add).await.0.unwrap();

        let (result, out) = run(&app, Command::Read { id: 1, no_open: true }).await;

        result.unwrap();
        assert_eq!(
            out.trim_end(),
            dir.path().join("articles").join("1.html").display().to_string()
        );
    }

    #[tokio::test]
    async fn failures_map_to_generic_messages() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path()).await;

        let add = Command::Add {
            url: "https://example.com/nope".to_string(),
            category: None,
        };
        let (result, _) = run(&app, add.clone()).await;
        let err = result.unwrap_err();
        assert_eq!(
            failure_message(&add, &err),
            "An error occurred while adding the article."
        );

        let read = Command::Read { id: 5, no_open: true };
        let (result, _) = run(&app, read.clone()).await;
        assert_eq!(
            failure_message(&read, &result.unwrap_err()),
            "Article not found."
        );
    }

    #[tokio::test]
    async fn unwritable_artifact_gets_its_own_add_message() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("articles");
        std::fs::write(&blocker, "not a directory").unwrap();
        let app = app_in(dir.path()).await;

        let add = Command::Add {
            url: "https://example.com/a".to_string(),
            category: None,
        };
        let (result, out) = run(&app, add.clone()).await;

        assert!(out.is_empty());
        assert_eq!(
            failure_message(&add, &result.unwrap_err()),
            "Article saved, but its archived copy could not be written. Try `rerender`."
        );
        let (_, listed) = run(&app, Command::List).await;
        assert!(listed.starts_with("ID: 1 | A"));
    }

    #[test]
    fn database_errors_share_one_message() {
        let err = AppError::Persistence(tokio_rusqlite::Error::ConnectionClosed);
        assert_eq!(
            failure_message(&Command::List, &err),
            "A database error occurred."
        );
        assert_eq!(
            failure_message(&Command::Read { id: 1, no_open: true }, &err),
            "A database error occurred."
        );
    }
}
