use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::article::Article;
use crate::content::{ContentRepository, SearchResults};

#[derive(Clone)]
struct AppState {
    repo: Arc<ContentRepository>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub fn router(repo: ContentRepository) -> Router {
    let state = AppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/api/blogs", get(list_blogs))
        .route("/api/blogs/:slug", get(get_blog))
        .route("/api/search-blogs", get(search_blogs))
        .route("/api/tags", get(list_tags))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, repo: ContentRepository) -> anyhow::Result<()> {
    tracing::info!(addr = %addr, root = %repo.root().display(), "starting content api");
    let app = router(repo);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {addr}: {err}"))?;
    tracing::info!(addr = %addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

/// Runs a synchronous repository call off the async workers.
async fn with_repo<T, F>(state: &AppState, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&ContentRepository) -> T + Send + 'static,
{
    let repo = Arc::clone(&state.repo);
    tokio::task::spawn_blocking(move || f(&repo))
        .await
        .map_err(|err| {
            tracing::error!(%err, "content task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blogs")
        })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Article>>, Response> {
    with_repo(&state, |repo| repo.all_blogs()).await.map(Json)
}

async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Article>, Response> {
    match with_repo(&state, move |repo| repo.blog_by_slug(&slug)).await? {
        Some(article) => Ok(Json(article)),
        None => Err(error_response(StatusCode::NOT_FOUND, "Blog not found")),
    }
}

async fn search_blogs(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>, Response> {
    with_repo(&state, move |repo| repo.search(&query.q))
        .await
        .map(Json)
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>, Response> {
    with_repo(&state, |repo| repo.all_tags()).await.map(Json)
}
