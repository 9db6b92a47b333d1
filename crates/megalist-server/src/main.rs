//! Megalist Server Binary
//!
//! Standalone server for the megalist list API.

use std::sync::Arc;

use megalist_server::{serve, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(5000);

    let state = Arc::new(AppState::new());
    serve(&format!("0.0.0.0:{port}"), state).await
}
