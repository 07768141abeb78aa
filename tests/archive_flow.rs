use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tempfile::tempdir;
use tokio::net::TcpListener;
use tokio_test::assert_ok;

use pocketpp::ai::ExtractiveSummarizer;
use pocketpp::db::Repository;
use pocketpp::render::HtmlRenderer;
use pocketpp::services::WebExtractor;
use pocketpp::{AppError, Archiver};

const STORY: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Fallback title</title>
    <meta property="og:title" content="Borrow Checker Field Notes">
    <meta property="og:image" content="/cover.png">
</head>
<body>
    <nav>Home | Archive | About</nav>
    <article>
        <p>The borrow checker rejects programs that alias mutable state.</p>
        <p>Most rejected programs can be fixed by shortening a borrow.</p>
        <p>The weather was pleasant and sunny that afternoon.</p>
        <p>Field notes show the borrow checker catching real aliasing bugs.</p>
    </article>
</body>
</html>"#;

async fn spawn_site() -> SocketAddr {
    let app = Router::new()
        .route("/story", get(|| async { Html(STORY) }))
        .route("/gone", get(|| async { StatusCode::NOT_FOUND }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn build_archiver(db_path: &Path, articles_dir: &Path) -> Archiver {
    let repository = Repository::new(db_path.to_str().unwrap()).await.unwrap();
    let summarizer = Arc::new(ExtractiveSummarizer::new(2));
    let extractor = WebExtractor::new(Duration::from_secs(5), summarizer).unwrap();
    Archiver::new(
        repository,
        Box::new(extractor),
        Box::new(HtmlRenderer),
        articles_dir,
    )
}

#[tokio::test]
async fn archives_a_live_page() {
    let site = spawn_site().await;
    let dir = tempdir().unwrap();
    let archiver = build_archiver(&dir.path().join("db.sqlite"), &dir.path().join("articles")).await;
    let url = format!("http://{site}/story");

    let added = assert_ok!(archiver.add(&url, "Rust").await);
    assert_eq!(added.title, "Borrow Checker Field Notes");
    assert_eq!(added.category, "Rust");

    let listed = archiver.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, added.id);
    assert!(listed[0].summary.contains("borrow checker"));
    assert!(!listed[0].summary.contains("weather"));

    let path = archiver.read(added.id).await.unwrap();
    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.contains("<h1>Borrow Checker Field Notes</h1>"));
    assert!(html.contains(&format!("src=\"http://{site}/cover.png\"")));
    assert!(!html.contains("Home | Archive"));
}

#[tokio::test]
async fn http_error_page_is_an_extraction_failure() {
    let site = spawn_site().await;
    let dir = tempdir().unwrap();
    let articles_dir = dir.path().join("articles");
    let archiver = build_archiver(&dir.path().join("db.sqlite"), &articles_dir).await;

    let err = archiver
        .add(&format!("http://{site}/gone"), "Rust")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Extraction { .. }));
    assert!(archiver.list().await.unwrap().is_empty());
    assert!(archiver.categories().await.unwrap().is_empty());
    assert!(!articles_dir.exists());
}

#[tokio::test]
async fn store_survives_reopen() {
    let site = spawn_site().await;
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("db.sqlite");
    let articles_dir = dir.path().join("articles");
    let url = format!("http://{site}/story");

    let first_id = {
        let archiver = build_archiver(&db_path, &articles_dir).await;
        archiver.add(&url, "Rust").await.unwrap().id
    };

    let archiver = build_archiver(&db_path, &articles_dir).await;
    let second = archiver.add(&url, "Rust").await.unwrap();

    assert_eq!(second.id, first_id + 1);
    let categories = archiver.categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].article_count, 2);
    assert!(archiver.read(first_id).await.is_ok());
}
