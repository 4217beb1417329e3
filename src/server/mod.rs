//! HTTP server rendering pages on request

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    handler::Handler,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{sort_newest_first, ContentError, ContentRepository};
use crate::templates::{pick_home_page, TemplateRenderer};
use crate::Site;

/// How long shared caches may keep a rendered response
///
/// The content layer never caches; this only shapes the `Cache-Control`
/// header seen by CDNs and browsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve from cache for this many seconds, then revalidate in the background
    Revalidate(u64),
    /// Always recompute
    NoStore,
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePolicy::Revalidate(seconds) => write!(
                f,
                "public, max-age=0, s-maxage={}, stale-while-revalidate",
                seconds
            ),
            CachePolicy::NoStore => f.write_str("no-store"),
        }
    }
}

/// Server state
struct AppState {
    repo: ContentRepository,
    templates: TemplateRenderer,
    home_page: Option<String>,
    revalidate: u64,
}

impl AppState {
    fn cached(&self) -> CachePolicy {
        CachePolicy::Revalidate(self.revalidate)
    }

    /// Run a repository call on the blocking pool
    async fn load<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&ContentRepository) -> Result<T, ContentError> + Send + 'static,
    {
        let repo = self.repo.clone();
        let loaded = tokio::task::spawn_blocking(move || f(&repo))
            .await
            .context("Content loading task failed")??;
        Ok(loaded)
    }

    fn html(&self, rendered: Result<String>, status: StatusCode, policy: CachePolicy) -> Response {
        match rendered {
            Ok(body) => (
                status,
                [(header::CACHE_CONTROL, policy.to_string())],
                Html(body),
            )
                .into_response(),
            Err(e) => self.internal_error(e),
        }
    }

    fn not_found(&self, policy: CachePolicy) -> Response {
        self.html(self.templates.not_found(), StatusCode::NOT_FOUND, policy)
    }

    fn internal_error(&self, err: anyhow::Error) -> Response {
        tracing::error!("Request failed: {:#}", err);
        let body = self
            .templates
            .error()
            .unwrap_or_else(|_| "Internal server error".to_string());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CACHE_CONTROL, CachePolicy::NoStore.to_string())],
            Html(body),
        )
            .into_response()
    }
}

/// Build the application router
pub fn router(site: &Site) -> Result<Router> {
    let state = Arc::new(AppState {
        repo: site.repository(),
        templates: TemplateRenderer::new(&site.config)?,
        home_page: site.config.home_page.clone(),
        revalidate: site.config.revalidate,
    });

    // Unknown paths try the static directory before the 404 page
    let static_files = ServeDir::new(&site.static_dir)
        .not_found_service(fallback_handler.with_state(state.clone()));

    Ok(Router::new()
        .route("/", get(home_handler))
        .route("/posts", get(posts_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/preview", get(preview_handler))
        .route("/preview/:slug", get(preview_post_handler))
        .fallback_service(static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http()))
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");
    tracing::info!("Serving content from {:?}", site.content_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.load(|repo| repo.get_all_pages()).await {
        Ok(pages) => {
            let home = pick_home_page(&pages, state.home_page.as_deref());
            state.html(state.templates.home(home), StatusCode::OK, state.cached())
        }
        Err(e) => state.internal_error(e),
    }
}

async fn posts_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.load(|repo| repo.get_all_posts()).await {
        Ok(mut posts) => {
            sort_newest_first(&mut posts);
            state.html(state.templates.post_list(&posts), StatusCode::OK, state.cached())
        }
        Err(e) => state.internal_error(e),
    }
}

async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.load(move |repo| repo.get_post_by_slug(&slug)).await {
        Ok(Some(post)) => state.html(state.templates.post(&post), StatusCode::OK, state.cached()),
        Ok(None) => state.not_found(state.cached()),
        Err(e) => state.internal_error(e),
    }
}

async fn preview_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.load(|repo| repo.get_all_posts()).await {
        Ok(mut posts) => {
            sort_newest_first(&mut posts);
            state.html(
                state.templates.preview(&posts),
                StatusCode::OK,
                CachePolicy::NoStore,
            )
        }
        Err(e) => state.internal_error(e),
    }
}

async fn preview_post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.load(move |repo| repo.get_post_by_slug(&slug)).await {
        Ok(Some(post)) => state.html(
            state.templates.post(&post),
            StatusCode::OK,
            CachePolicy::NoStore,
        ),
        Ok(None) => state.not_found(CachePolicy::NoStore),
        Err(e) => state.internal_error(e),
    }
}

async fn fallback_handler(State(state): State<Arc<AppState>>) -> Response {
    state.not_found(state.cached())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site() -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        fs::create_dir_all(site.content_dir.join("posts")).unwrap();
        fs::create_dir_all(site.content_dir.join("pages")).unwrap();
        (tmp, site)
    }

    fn write_post(site: &Site, name: &str, content: &str) {
        fs::write(site.content_dir.join("posts").join(name), content).unwrap();
    }

    async fn get(site: &Site, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router(site)
            .unwrap()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let cache_control = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, cache_control, String::from_utf8_lossy(&body).into_owned())
    }

    #[test]
    fn test_cache_policy_header() {
        assert_eq!(
            CachePolicy::Revalidate(60).to_string(),
            "public, max-age=0, s-maxage=60, stale-while-revalidate"
        );
        assert_eq!(CachePolicy::NoStore.to_string(), "no-store");
    }

    #[tokio::test]
    async fn test_empty_site_renders() {
        let (_tmp, site) = site();

        let (status, cache, body) = get(&site, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            cache.as_deref(),
            Some("public, max-age=0, s-maxage=60, stale-while-revalidate")
        );
        assert!(body.contains("Welcome"));

        let (status, _, body) = get(&site, "/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(">Blog</h2>"));
    }

    #[tokio::test]
    async fn test_home_uses_first_page() {
        let (_tmp, site) = site();
        fs::write(
            site.content_dir.join("pages").join("home.md"),
            "---\ntitle: Launch Day\nexcerpt: Ship it\n---\n",
        )
        .unwrap();

        let (status, _, body) = get(&site, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Launch Day"));
        assert!(body.contains("Ship it"));
    }

    #[tokio::test]
    async fn test_posts_listed_newest_first() {
        let (_tmp, site) = site();
        write_post(&site, "a.md", "---\ntitle: Older\ndate: \"2024-01-01\"\n---\n");
        write_post(&site, "b.md", "---\ntitle: Newer\ndate: \"2024-06-01\"\n---\n");

        let (_, _, body) = get(&site, "/posts").await;
        assert!(body.find("Newer").unwrap() < body.find("Older").unwrap());
        assert!(body.contains("href=\"/posts/b\""));
    }

    #[tokio::test]
    async fn test_post_detail_and_unknown_slug() {
        let (_tmp, site) = site();
        write_post(
            &site,
            "hello-world.md",
            "---\ntitle: \"Hello\"\ndate: \"2024-01-01\"\n---\n# Hi\n\nBody text",
        );

        let (status, _, body) = get(&site, "/posts/hello-world").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Hi</h1>"));
        assert!(body.contains("Mon Jan 01 2024"));

        let (status, _, body) = get(&site, "/posts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("404"));
    }

    #[tokio::test]
    async fn test_preview_is_never_cached() {
        let (_tmp, site) = site();
        write_post(&site, "draft.md", "---\ntitle: Draft\n---\nWork in progress");

        let (status, cache, body) = get(&site, "/preview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert!(body.contains("Preview (SSR)"));
        assert!(body.contains("Draft"));

        let (status, cache, body) = get(&site, "/preview/draft").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert!(body.contains("Work in progress"));

        // Edits show up on the next request
        write_post(&site, "draft.md", "---\ntitle: Draft\n---\nFinished");
        let (_, _, body) = get(&site, "/preview/draft").await;
        assert!(body.contains("Finished"));
    }

    #[tokio::test]
    async fn test_static_files_and_fallback() {
        let (_tmp, site) = site();
        fs::create_dir_all(site.static_dir.join("uploads")).unwrap();
        fs::write(site.static_dir.join("uploads").join("logo.txt"), "logo").unwrap();

        let (status, _, body) = get(&site, "/uploads/logo.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "logo");

        let (status, _, body) = get(&site, "/missing/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("404"));
    }

    #[tokio::test]
    async fn test_broken_content_is_a_500() {
        let (_tmp, site) = site();
        write_post(&site, "broken.md", "---\ntitle: [oops\n---\n");

        let (status, cache, body) = get(&site, "/posts").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert!(body.contains("Something went wrong"));
    }
}
