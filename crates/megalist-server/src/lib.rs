//! Megalist Server - paginated ordering API
//!
//! HTTP façade over the megalist-core engine: a JSON API for page
//! retrieval, selection updates, and drag-and-drop order mutations, plus
//! static SPA serving for the list UI.

pub mod http;
pub mod spa;

use std::sync::Arc;

use axum::{
    routing::{any, get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use megalist_core::{ListConfig, ListState};

/// Shared application state
pub struct AppState {
    pub list: RwLock<ListState>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(ListConfig::default())
    }

    pub fn with_config(config: ListConfig) -> Self {
        Self {
            list: RwLock::new(ListState::new(config)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // List endpoints
        .route("/api/items", get(http::get_items))
        .route("/api/selection", post(http::set_selection))
        .route("/api/order", post(http::update_order))
        .route("/api/settings", get(http::get_settings))
        // Liveness probes
        .route("/api/test", get(http::api_test))
        .route("/api/hello", get(http::api_hello))
        // Anything else under /api is a JSON 404
        .route("/api/{*path}", any(http::api_not_found))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    spa::with_spa_fallback(router)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("megalist server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = ListConfig {
            catalog_size: 50,
            initial_order_len: 10,
            scan_lookahead: 5,
            extend_batch_size: 8,
            transport_order_cap: 25,
            ..ListConfig::default()
        };
        create_router(Arc::new(AppState::with_config(config)))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn item_ids(body: &Value) -> Vec<u64> {
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_u64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn items_returns_the_first_page() {
        let app = test_app();
        let (status, body) = get(&app, "/api/items?page=1&limit=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(item_ids(&body), vec![1, 2]);
        assert_eq!(body["items"][0]["value"], "Item 1");
        assert_eq!(body["items"][0]["selected"], false);
        assert_eq!(body["totalItems"], 50);
        assert_eq!(body["totalPages"], 25);
        assert_eq!(body["hasMore"], true);
        assert_eq!(body["currentPage"], 1);
        assert!(body["serverTimestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn items_normalizes_garbage_paging() {
        let app = test_app();
        let (status, body) = get(&app, "/api/items?page=abc&limit=0").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["items"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn items_filters_by_search() {
        let app = test_app();
        let (status, body) = get(&app, "/api/items?page=1&limit=100&search=2").await;

        assert_eq!(status, StatusCode::OK);
        // Ids in 1..=50 containing the digit 2: 2, 12, 20..=29, 32, 42.
        assert_eq!(body["totalItems"], 14);
        assert_eq!(item_ids(&body).len(), 14);
    }

    #[tokio::test]
    async fn selection_round_trip() {
        let app = test_app();

        let (status, body) = post(&app, "/api/selection", json!({ "selectedIds": [5, 9] })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["selectedCount"], 2);

        let (_, body) = post(&app, "/api/selection", json!({ "selectedIds": [9] })).await;
        assert_eq!(body["selectedCount"], 1);

        let (_, body) = get(&app, "/api/items?page=1&limit=10").await;
        let selected: Vec<u64> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|item| item["selected"] == true)
            .map(|item| item["id"].as_u64().unwrap())
            .collect();
        assert_eq!(selected, vec![9]);
    }

    #[tokio::test]
    async fn selection_rejects_non_array() {
        let app = test_app();
        let (status, body) = post(&app, "/api/selection", json!({ "selectedIds": "nope" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn move_then_first_page() {
        let app = test_app();

        let (status, body) = post(&app, "/api/order", json!({ "fromId": 1, "toId": 3 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, body) = get(&app, "/api/items?page=1&limit=3").await;
        assert_eq!(item_ids(&body), vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn replace_then_settings() {
        let app = test_app();

        let (status, body) = post(&app, "/api/order", json!({ "order": [7, 3] })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, body) = get(&app, "/api/settings").await;
        let order: Vec<u64> = body["customOrder"]
            .as_array()
            .unwrap()
            .iter()
            .map(|id| id.as_u64().unwrap())
            .collect();
        assert_eq!(&order[..4], &[7, 3, 1, 2]);
        assert_eq!(body["selectedIds"], json!([]));
    }

    #[tokio::test]
    async fn order_rejects_bad_requests() {
        let app = test_app();

        let (status, body) = post(&app, "/api/order", json!({ "fromId": 1, "toId": 999 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(body["id"], 999);

        let (status, _) = post(&app, "/api/order", json!({ "order": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post(&app, "/api/order", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn settings_before_first_request_has_no_order() {
        let app = test_app();
        let (status, body) = get(&app, "/api/settings").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["customOrder"].is_null());
        assert_eq!(body["selectedIds"], json!([]));
    }

    #[tokio::test]
    async fn settings_truncates_the_order() {
        let app = test_app();
        // Moving id 50 extends the order to the full 50-item catalog.
        let (status, _) = post(&app, "/api/order", json!({ "fromId": 50, "toId": 1 })).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = get(&app, "/api/settings").await;
        // Transport cap is 25 in the test config.
        assert_eq!(body["customOrder"].as_array().unwrap().len(), 25);
    }

    #[tokio::test]
    async fn unknown_api_route_is_json_404() {
        let app = test_app();
        let (status, body) = get(&app, "/api/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn non_api_routes_404_without_a_static_root() {
        let app = test_app();
        let (status, _) = get(&app, "/some/client/route").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn liveness_probes_respond() {
        let app = test_app();

        let (status, body) = get(&app, "/api/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API is working!");

        let (status, body) = get(&app, "/api/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API is working!");
        assert_eq!(body["url"], "/api/hello");
        assert!(body["time"].is_string());
    }
}
