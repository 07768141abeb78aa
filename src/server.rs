//! HTTP API and the bundled single-page UI.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::archiver::Archiver;
use crate::error::{ErrorKind, Result};
use crate::models::{ArticleSummary, Category};

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCRIPTS_JS: &str = include_str!("../static/scripts.js");

#[derive(Clone)]
pub struct AppState {
    archiver: Arc<Archiver>,
    default_category: String,
}

#[derive(Debug, Deserialize)]
pub struct AddArticleRequest {
    pub url: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddArticleResponse {
    pub message: &'static str,
    pub id: i64,
    pub title: String,
    pub category: String,
}

/// Error body shaped as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: &'static str,
}

impl ApiError {
    fn internal(detail: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail,
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: "Article not found.",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        Self {
            status: rejection.status(),
            detail: "Invalid request body.",
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected request path");
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: "Invalid article id.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

pub fn router(archiver: Arc<Archiver>, default_category: String) -> Router {
    let state = AppState {
        archiver,
        default_category,
    };

    Router::new()
        .route("/", get(index))
        .route("/static/scripts.js", get(scripts))
        .route("/articles", get(list_articles).post(add_article))
        .route("/articles/", get(list_articles).post(add_article))
        .route("/articles/:id/read", get(read_article))
        .route("/categories/", get(list_categories))
        .with_state(state)
}

pub async fn serve(archiver: Arc<Archiver>, addr: &str, default_category: String) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Serving HTTP API");
    axum::serve(listener, router(archiver, default_category)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn scripts() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPTS_JS,
    )
}

async fn add_article(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddArticleRequest>, JsonRejection>,
) -> std::result::Result<Json<AddArticleResponse>, ApiError> {
    let Json(request) = payload?;
    let category = request
        .category
        .unwrap_or_else(|| state.default_category.clone());

    match state.archiver.add(&request.url, &category).await {
        Ok(added) => Ok(Json(AddArticleResponse {
            message: "Article saved successfully!",
            id: added.id,
            title: added.title,
            category: added.category,
        })),
        Err(e) => {
            tracing::error!(error = %e, url = %request.url, "Error in 'add' endpoint");
            Err(ApiError::internal(match e.kind() {
                ErrorKind::Render => {
                    "Article saved, but its archived copy could not be written."
                }
                _ => "An error occurred while adding the article.",
            }))
        }
    }
}

async fn list_articles(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<ArticleSummary>>, ApiError> {
    state.archiver.list().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "Error in 'list' endpoint");
        ApiError::internal("An error occurred while listing articles.")
    })
}

async fn read_article(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> std::result::Result<Html<String>, ApiError> {
    let Path(id) = id?;
    match read_artifact(&state.archiver, id).await {
        Ok(body) => Ok(Html(body)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ApiError::not_found()),
        Err(e) => {
            tracing::error!(error = %e, id, "Error in 'read' endpoint");
            Err(ApiError::internal(
                "An error occurred while reading the article.",
            ))
        }
    }
}

async fn read_artifact(archiver: &Archiver, id: i64) -> Result<String> {
    let path = archiver.read(id).await?;
    Ok(tokio::fs::read_to_string(path).await?)
}

async fn list_categories(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<Category>>, ApiError> {
    state.archiver.categories().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "Error in 'categories' endpoint");
        ApiError::internal("An error occurred while listing categories.")
    })
}
