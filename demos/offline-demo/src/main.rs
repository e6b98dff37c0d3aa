//! offline-demo entry point.
//!
//! Drives the full worker flow against a simulated origin: install the
//! offline partition, activate and prune an old version, browse a few
//! pages while online, then pull the plug and watch the cache and
//! fallbacks take over. Run with `RUST_LOG=debug` to see every strategy
//! decision.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use http::header::ACCEPT;
use http::{HeaderValue, StatusCode};
use skiff_cache::{CacheStore, MemoryStore, PartitionName};
use skiff_core::{ClientHub, Fetch, FetchError, Request, Response};
use skiff_worker::{CacheWorker, NotificationClick, WorkerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A pretend origin server that can be taken offline.
struct DemoOrigin {
    pages: HashMap<String, &'static str>,
    online: Arc<AtomicBool>,
}

impl DemoOrigin {
    fn new() -> Self {
        let mut pages = HashMap::new();
        pages.insert("/".to_string(), "<html>welcome</html>");
        pages.insert("/offline.html".to_string(), "<html>you are offline</html>");
        pages.insert("/img/placeholder.png".to_string(), "placeholder-png-bytes");
        pages.insert(
            "/article/rust-workers".to_string(),
            "<html>rust workers, explained</html>",
        );
        pages.insert(
            "https://api.example.com/v1/books".to_string(),
            r#"["The Rust Book"]"#,
        );
        Self {
            pages,
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Handle for flipping the origin on and off after the worker owns it.
    fn online_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.online)
    }
}

#[async_trait]
impl Fetch for DemoOrigin {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(FetchError::Unreachable(request.url().to_string()));
        }
        match self.pages.get(request.url()) {
            Some(body) => Ok(Response::new(StatusCode::OK).with_body(*body)),
            None => Ok(Response::new(StatusCode::NOT_FOUND)),
        }
    }
}

/// Logs broadcasts instead of posting to real client windows.
struct LoggingHub;

#[async_trait]
impl ClientHub for LoggingHub {
    async fn claim(&self) {
        info!("claimed open clients");
    }

    async fn broadcast(&self, message: &str) {
        info!(message = %message, "broadcast to clients");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let origin = DemoOrigin::new();
    let online = origin.online_flag();

    let config = WorkerConfig::new("demo_v1")
        .with_offline_resources(vec!["/", "/offline.html", "/img/placeholder.png"])
        .with_placeholder_image("/img/placeholder.png")
        .with_always_fetch(r"^https?://api\.example\.com/");

    let store = Arc::new(MemoryStore::new());
    // A partition left behind by a previous deployment, so activation has
    // something to prune.
    store
        .put(
            &PartitionName::from_raw("demo_v0:offline"),
            &Request::get("/offline.html"),
            Response::new(StatusCode::OK).with_body("<html>stale offline page</html>"),
        )
        .await?;

    let worker = CacheWorker::new(config, Arc::clone(&store), origin, LoggingHub)?;

    let install = worker.handle_install().await?;
    info!(
        resources = install.resources_cached,
        skip_waiting = install.skip_waiting,
        "install finished"
    );

    let activate = worker.handle_activate().await?;
    info!(pruned = activate.partitions_removed.len(), "activation finished");

    // Browse while online: pages are served live and captured as they pass.
    let article = Request::get("/article/rust-workers")
        .with_header(ACCEPT, HeaderValue::from_static("text/html"));
    log_response("article while online", worker.handle_fetch(article.clone()).await);
    log_response(
        "api while online",
        worker
            .handle_fetch(Request::get("https://api.example.com/v1/books"))
            .await,
    );

    // Give the detached cache writes a moment to land.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Pull the plug. Captured pages come back from the cache, unknown
    // images degrade to the placeholder, unvisited pages to the offline
    // document.
    online.store(false, Ordering::SeqCst);
    info!("origin is now offline");

    log_response("article while offline", worker.handle_fetch(article).await);
    log_response(
        "unknown image while offline",
        worker.handle_fetch(Request::get("/img/vacation.jpg")).await,
    );
    let unvisited =
        Request::get("/never-seen").with_header(ACCEPT, HeaderValue::from_static("text/html"));
    log_response("unvisited page while offline", worker.handle_fetch(unvisited).await);

    // A notification click resolves its action and broadcasts it.
    let action = worker
        .handle_notification_click(NotificationClick::new("show-book", "new-post"))
        .await;
    info!(action = %action, "notification click resolved");

    Ok(())
}

fn log_response(label: &str, response: Response) {
    let status = response.status();
    let body = response.into_body();
    let preview: String = String::from_utf8_lossy(&body).chars().take(48).collect();
    info!(%status, body = %preview, "{}", label);
}
