//! Add / list / read orchestration over the store, extractor and renderer.

use std::io;
use std::path::{Path, PathBuf};

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{AddedArticle, Article, ArticleSummary, Category, NewArticle};
use crate::render::{artifact_path, ArticleView, Renderer};
use crate::services::Extractor;

pub struct Archiver {
    repository: Repository,
    extractor: Box<dyn Extractor>,
    renderer: Box<dyn Renderer>,
    articles_dir: PathBuf,
}

impl Archiver {
    pub fn new(
        repository: Repository,
        extractor: Box<dyn Extractor>,
        renderer: Box<dyn Renderer>,
        articles_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository,
            extractor,
            renderer,
            articles_dir: articles_dir.into(),
        }
    }

    /// Fetch `url`, store it under `category` and write its artifact.
    ///
    /// Nothing is written if extraction fails. A render failure leaves the
    /// stored row in place and is reported as [`AppError::Render`].
    pub async fn add(&self, url: &str, category: &str) -> Result<AddedArticle> {
        tracing::info!(url, category, "Adding article");

        if url.trim().is_empty() {
            return Err(AppError::extraction(url, "empty URL"));
        }

        let extracted = self.extractor.fetch(url).await.map_err(|e| match e {
            AppError::Extraction { .. } => e,
            other => AppError::extraction(url, other),
        })?;
        tracing::info!(title = %extracted.title, "Extracted article");

        let (article, created) = self
            .repository
            .insert_article(NewArticle::from_extracted(url, extracted), category.to_string())
            .await?;
        if created {
            tracing::info!(category, "Created category");
        }
        tracing::info!(id = article.id, category_id = article.category_id, "Saved article");

        self.write_artifact(&article).await?;

        Ok(AddedArticle {
            id: article.id,
            title: article.title,
            category: category.to_string(),
        })
    }

    pub async fn list(&self) -> Result<Vec<ArticleSummary>> {
        let articles = self.repository.list_article_summaries().await?;
        tracing::info!(count = articles.len(), "Listed articles");
        Ok(articles)
    }

    /// Location of the rendered artifact for `id`. Only the filesystem is
    /// consulted.
    pub async fn read(&self, id: i64) -> Result<PathBuf> {
        let path = artifact_path(&self.articles_dir, id);
        if self.artifact_exists(&path).await? {
            tracing::info!(id, path = %path.display(), "Found artifact");
            Ok(path)
        } else {
            tracing::warn!(id, path = %path.display(), "Artifact not found");
            Err(AppError::NotFound(id))
        }
    }

    /// A path under an artifacts "directory" that is really a file cannot
    /// exist, so that case reads as missing rather than as an I/O error.
    async fn artifact_exists(&self, path: &Path) -> Result<bool> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => match tokio::fs::metadata(&self.articles_dir).await {
                Ok(dir) if !dir.is_dir() => Ok(false),
                _ => Err(e.into()),
            },
        }
    }

    /// Render the stored article `id` again, replacing its artifact.
    pub async fn rerender(&self, id: i64) -> Result<PathBuf> {
        let article = self
            .repository
            .get_article(id)
            .await?
            .ok_or(AppError::NotFound(id))?;
        self.write_artifact(&article).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.repository.list_categories().await
    }

    async fn write_artifact(&self, article: &Article) -> Result<PathBuf> {
        let view = ArticleView::from(article);
        let html = self.renderer.render(&view).map_err(|e| match e {
            AppError::Render { .. } => e,
            other => AppError::render(article.id, other),
        })?;

        let path = artifact_path(&self.articles_dir, article.id);
        tokio::fs::create_dir_all(&self.articles_dir)
            .await
            .map_err(|e| AppError::render(article.id, e))?;
        tokio::fs::write(&path, html)
            .await
            .map_err(|e| AppError::render(article.id, e))?;

        tracing::info!(id = article.id, path = %path.display(), "Wrote artifact");
        Ok(path)
    }
}
