//! Page request and result types

use serde::Serialize;

use crate::catalog::{Item, ItemId};
use crate::config::ListConfig;

/// A fully-normalized page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub search: String,
    /// When set, the order walk covers exactly the requested window instead
    /// of the doubled reorder lookahead.
    pub suppress_reorder_window: bool,
}

impl PageRequest {
    pub fn new(
        page: u64,
        limit: u64,
        search: impl Into<String>,
        suppress_reorder_window: bool,
    ) -> Self {
        Self {
            page,
            limit,
            search: search.into(),
            suppress_reorder_window,
        }
    }

    /// Build a request from raw query values. Missing, non-numeric, or
    /// non-positive page/limit fall back to the configured defaults; an empty
    /// search means "no search". Raw values are never rejected.
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        search: Option<&str>,
        no_reorder: Option<&str>,
        config: &ListConfig,
    ) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(config.default_page),
            limit: parse_positive(limit).unwrap_or(config.default_limit),
            search: search.unwrap_or_default().to_string(),
            suppress_reorder_window: parse_flag(no_reorder),
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|&n| n > 0)
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("true") | Some("1"))
}

/// A returned item annotated with selection membership.
#[derive(Debug, Clone, Serialize)]
pub struct PageItem {
    pub id: ItemId,
    pub value: String,
    pub selected: bool,
}

impl PageItem {
    pub fn new(item: Item, selected: bool) -> Self {
        Self {
            id: item.id,
            value: item.value,
            selected,
        }
    }
}

/// One paginated window into the ordered, optionally-filtered list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub items: Vec<PageItem>,
    pub total_items: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub has_more: bool,
    /// Milliseconds since the Unix epoch, UTC
    pub server_timestamp: i64,
}
