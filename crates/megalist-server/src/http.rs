//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use megalist_core::{ItemId, ListError, OrderError, PageRequest, PageResult};

use crate::AppState;

/// Raw query for `GET /api/items`.
///
/// Values arrive as strings and are normalized by the engine; a garbage
/// `page` or `limit` falls back to the defaults instead of rejecting the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "noReorder")]
    pub no_reorder: Option<String>,
}

/// Get one page of the ordered, optionally-filtered list
pub async fn get_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ItemsQuery>,
) -> Json<PageResult> {
    // Retrieval may lazily initialize the custom order, so it takes the
    // write lock like the mutation handlers.
    let mut list = state.list.write().await;
    let request = PageRequest::from_raw(
        query.page.as_deref(),
        query.limit.as_deref(),
        query.search.as_deref(),
        query.no_reorder.as_deref(),
        list.config(),
    );
    Json(list.retrieve(&request))
}

/// Replace the selection wholesale
pub async fn set_selection(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(values) = body.get("selectedIds").and_then(Value::as_array) else {
        return Err(bad_request("selectedIds must be an array"));
    };
    let Some(ids) = parse_id_array(values) else {
        return Err(bad_request("selectedIds must contain only positive integers"));
    };

    let count = state.list.write().await.set_selection(ids);
    Ok(Json(json!({ "success": true, "selectedCount": count })))
}

/// Apply an order mutation: `{fromId, toId}` moves a single item,
/// `{order: [...]}` replaces the whole order.
pub async fn update_order(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let from_id = body.get("fromId").and_then(Value::as_u64);
    let to_id = body.get("toId").and_then(Value::as_u64);

    if let (Some(from_id), Some(to_id)) = (from_id, to_id) {
        let mut list = state.list.write().await;
        return match list.move_item(from_id, to_id) {
            Ok(()) => Ok(Json(json!({ "success": true }))),
            Err(err) => Err(error_response(err)),
        };
    }

    if let Some(order) = body.get("order") {
        let Some(ids) = order.as_array().and_then(|values| parse_id_array(values)) else {
            return Err(bad_request("order must be an array of positive integers"));
        };
        let mut list = state.list.write().await;
        return match list.replace_order(ids) {
            Ok(_) => Ok(Json(json!({ "success": true }))),
            Err(err) => Err(error_response(err)),
        };
    }

    Err(bad_request("expected fromId and toId, or order"))
}

/// Current selection and the (truncated) custom order
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<Value> {
    let list = state.list.read().await;
    let (selected_ids, custom_order) = list.settings_snapshot();
    Json(json!({
        "selectedIds": selected_ids,
        "customOrder": custom_order,
    }))
}

/// Liveness probe
pub async fn api_test() -> Json<Value> {
    Json(json!({ "message": "API is working!" }))
}

/// Liveness probe with request echo
pub async fn api_hello(uri: Uri) -> Json<Value> {
    Json(json!({
        "message": "API is working!",
        "time": Utc::now().to_rfc3339(),
        "url": uri.to_string(),
    }))
}

/// 404 for unknown `/api` routes
pub async fn api_not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

fn parse_id_array(values: &[Value]) -> Option<Vec<ItemId>> {
    values
        .iter()
        .map(|value| value.as_u64().filter(|&id| id >= 1))
        .collect()
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn error_response(err: ListError) -> (StatusCode, Json<Value>) {
    match err {
        ListError::Order(OrderError::UnknownItem { id }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Item not found in catalog: {id}"),
                "id": id,
            })),
        ),
        ListError::Order(OrderError::NotInOrder {
            from_id,
            to_id,
            from_index,
            to_index,
        }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Items not found in custom order",
                "fromId": from_id,
                "toId": to_id,
                "fromIndex": from_index,
                "toIndex": to_index,
            })),
        ),
        ListError::Order(OrderError::EmptyOrder) => {
            bad_request("order must not be empty")
        }
        ListError::InvalidInput(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": message })),
        ),
        ListError::Internal(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        ),
    }
}
