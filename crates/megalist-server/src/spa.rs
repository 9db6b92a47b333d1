//! Static file / SPA serving collaborator
//!
//! The list UI is a single-page app served from whichever static root the
//! deployment ships. Client-side routes fall back to `index.html`; with no
//! static root present every non-API path is a 404.

use std::path::PathBuf;

use axum::{http::StatusCode, Router};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

/// Candidate static roots, first existing wins
const STATIC_ROOTS: [&str; 2] = ["public", "client/dist"];

fn find_static_root() -> Option<PathBuf> {
    STATIC_ROOTS
        .iter()
        .map(PathBuf::from)
        .find(|root| root.join("index.html").is_file())
}

/// Attach the SPA fallback to the API router
pub fn with_spa_fallback(router: Router) -> Router {
    match find_static_root() {
        Some(root) => {
            info!(root = %root.display(), "serving static files");
            let index = ServeFile::new(root.join("index.html"));
            router.fallback_service(ServeDir::new(root).fallback(index))
        }
        None => router.fallback(no_spa),
    }
}

async fn no_spa() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
