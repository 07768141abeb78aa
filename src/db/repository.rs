use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Article, ArticleSummary, Category, NewArticle, UNCATEGORIZED};

use super::schema::SCHEMA;

const ARTICLE_COLUMNS: &str = r#"SELECT a.id, a.category_id, c.name, a.url, a.title, a.content,
                                      a.summary, a.image_url, a.created_at
                               FROM articles a
                               LEFT JOIN categories c ON a.category_id = c.id"#;

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Article operations

    /// Resolve `category` by exact name, creating it if absent, and insert
    /// the article in the same transaction. Returns the stored article and
    /// whether the category row was created by this call.
    ///
    /// A concurrent writer creating the same name makes the insert a no-op;
    /// the follow-up select then picks up the existing row.
    pub async fn insert_article(
        &self,
        article: NewArticle,
        category: String,
    ) -> Result<(Article, bool)> {
        let stored = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let created = tx.execute(
                    "INSERT INTO categories (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
                    params![category],
                )? > 0;
                let category_id: i64 = tx.query_row(
                    "SELECT id FROM categories WHERE name = ?1",
                    params![category],
                    |row| row.get(0),
                )?;

                tx.execute(
                    r#"INSERT INTO articles (category_id, url, title, content, summary, image_url)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                    params![
                        category_id,
                        article.url,
                        article.title,
                        article.content,
                        article.summary,
                        article.image_url,
                    ],
                )?;
                let id = tx.last_insert_rowid();

                let stored = tx.query_row(
                    &format!("{ARTICLE_COLUMNS} WHERE a.id = ?1"),
                    params![id],
                    article_from_row,
                )?;

                tx.commit()?;
                Ok((stored, created))
            })
            .await?;
        Ok(stored)
    }

    pub async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let article = self
            .conn
            .call(move |conn| {
                let article = conn
                    .query_row(
                        &format!("{ARTICLE_COLUMNS} WHERE a.id = ?1"),
                        params![id],
                        article_from_row,
                    )
                    .optional()?;
                Ok(article)
            })
            .await?;
        Ok(article)
    }

    pub async fn list_article_summaries(&self) -> Result<Vec<ArticleSummary>> {
        let summaries = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT a.id, a.title, c.name, a.summary
                       FROM articles a
                       LEFT JOIN categories c ON a.category_id = c.id
                       ORDER BY a.id"#,
                )?;
                let summaries = stmt
                    .query_map([], summary_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(summaries)
            })
            .await?;
        Ok(summaries)
    }

    // Category operations

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT c.id, c.name, COUNT(a.id)
                       FROM categories c
                       LEFT JOIN articles a ON a.category_id = c.id
                       GROUP BY c.id, c.name
                       ORDER BY c.name"#,
                )?;
                let categories = stmt
                    .query_map([], |row| {
                        Ok(Category {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            article_count: row.get(2)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(categories)
            })
            .await?;
        Ok(categories)
    }

    #[cfg(test)]
    pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute_batch(sql)?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite datetime('now') format, e.g. "2026-01-11 12:34:56"
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn article_from_row(row: &Row) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        category_id: row.get(1)?,
        category_name: row.get(2)?,
        url: row.get(3)?,
        title: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        content: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        summary: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        image_url: row.get(7)?,
        created_at: row
            .get::<_, Option<String>>(8)?
            .and_then(|s| parse_datetime(&s)),
    })
}

fn summary_from_row(row: &Row) -> rusqlite::Result<ArticleSummary> {
    Ok(ArticleSummary {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        category: row
            .get::<_, Option<String>>(2)?
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        summary: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}
