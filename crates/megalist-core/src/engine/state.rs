//! Aggregate root for the ordering and pagination engine

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};

use crate::catalog::{Catalog, ItemId};
use crate::config::ListConfig;
use crate::error::{ListError, OrderError, Result};
use crate::order::CustomOrder;
use crate::selection::SelectionStore;

use super::page::{PageItem, PageRequest, PageResult};

/// The aggregate root for the list state: catalog, custom order, selection.
///
/// The catalog is immutable; the custom order and selection are mutated only
/// through the operations below. Callers are expected to serialize mutating
/// operations (one request's read-modify-write completes before the next
/// begins).
pub struct ListState {
    config: ListConfig,
    catalog: Catalog,
    order: Option<CustomOrder>,
    selection: SelectionStore,
}

impl ListState {
    /// Create a new list state; the custom order stays uninitialized until
    /// first use
    pub fn new(config: ListConfig) -> Self {
        let catalog = Catalog::new(config.catalog_size);
        Self {
            config,
            catalog,
            order: None,
            selection: SelectionStore::new(),
        }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ==================== Custom Order ====================

    /// Initialize the custom order to the configured id prefix if it is
    /// absent or empty
    fn ensure_order(&mut self) {
        let initialized = self.order.as_ref().is_some_and(|order| !order.is_empty());
        if !initialized {
            let prefix = self.config.initial_order_len.min(self.config.catalog_size);
            info!(prefix, "initializing custom order");
            self.order = Some(CustomOrder::with_prefix(prefix));
        }
    }

    /// Extend the custom order so `max_needed` is covered. Returns whether
    /// an initialization or extension occurred.
    pub fn extend_order(&mut self, max_needed: ItemId) -> bool {
        let was_uninitialized = self.order.as_ref().map_or(true, |order| order.is_empty());
        self.ensure_order();

        let catalog_len = self.catalog.len();
        let batch = self.config.extend_batch_size;
        let extended = match self.order.as_mut() {
            Some(order) => {
                let extended = order.extend_to(max_needed, catalog_len, batch);
                if extended {
                    debug!(max_needed, len = order.len(), "custom order extended");
                }
                extended
            }
            None => false,
        };

        was_uninitialized || extended
    }

    /// Custom order length, 0 before first initialization
    pub fn order_len(&self) -> usize {
        self.order.as_ref().map_or(0, CustomOrder::len)
    }

    // ==================== Page Retrieval ====================

    /// Compute one paginated window into the ordered, optionally-filtered
    /// list.
    ///
    /// The custom order is walked only as far as the visible window needs
    /// (plus lookahead); anything the walk missed is backfilled in catalog
    /// order so totals stay complete.
    pub fn retrieve(&mut self, request: &PageRequest) -> PageResult {
        self.ensure_order();

        let page = request.page.max(1);
        let limit = request.limit.max(1);
        let needle = request.search.to_lowercase();
        let searching = !needle.is_empty();
        let suppress = request.suppress_reorder_window;

        let window_factor = if suppress { 1 } else { 2 };
        let visible_window = clamp_to_usize(page.saturating_mul(limit).saturating_mul(window_factor));
        let page_end = clamp_to_usize(page.saturating_mul(limit));
        let page_start = clamp_to_usize(page.saturating_sub(1).saturating_mul(limit));

        let order_ids: &[ItemId] = self.order.as_ref().map(CustomOrder::ids).unwrap_or(&[]);

        // Walk the custom order, keeping candidate ids. Searching (and the
        // suppressed window) must see the whole order; otherwise a bounded
        // prefix covers the visible region.
        let scan_len = if searching || suppress {
            order_ids.len()
        } else {
            order_ids
                .len()
                .min(visible_window.saturating_add(self.config.scan_lookahead))
        };

        let mut ordered: Vec<ItemId> = Vec::new();
        let mut used: HashSet<ItemId> = HashSet::new();
        for &id in &order_ids[..scan_len] {
            let keep = if searching {
                self.catalog.matches(id, &needle)
            } else {
                self.catalog.contains(id)
            };
            if !keep {
                continue;
            }
            ordered.push(id);
            used.insert(id);
            if ordered.len() >= visible_window {
                break;
            }
        }

        let total_items = if searching {
            self.catalog.count_matches(&needle)
        } else {
            self.catalog.len()
        };

        // Backfill candidates the walk did not reach.
        if !searching {
            if ordered.len() < page_end && (ordered.len() as u64) < total_items {
                let mut needed = page_end - ordered.len();
                let mut id: ItemId = 1;
                while needed > 0 && id <= self.catalog.len() {
                    if !used.contains(&id) {
                        ordered.push(id);
                        needed -= 1;
                    }
                    id += 1;
                }
            }
        } else if (ordered.len() as u64) < total_items {
            for id in 1..=self.catalog.len() {
                if !used.contains(&id) && self.catalog.matches(id, &needle) {
                    ordered.push(id);
                }
            }
        }

        let window = if page_start < ordered.len() {
            &ordered[page_start..page_end.min(ordered.len())]
        } else {
            &[]
        };

        let items: Vec<PageItem> = window
            .iter()
            .filter_map(|&id| self.catalog.get(id))
            .map(|item| {
                let selected = self.selection.is_selected(item.id);
                PageItem::new(item, selected)
            })
            .collect();

        PageResult {
            items,
            total_items,
            current_page: page,
            total_pages: total_items.div_ceil(limit),
            has_more: page.saturating_mul(limit) < total_items,
            server_timestamp: Utc::now().timestamp_millis(),
        }
    }

    // ==================== Order Mutations ====================

    /// Move `from_id` relative to `to_id` in the custom order, extending the
    /// order first when either id lies beyond it.
    pub fn move_item(&mut self, from_id: ItemId, to_id: ItemId) -> Result<()> {
        if !self.catalog.contains(from_id) {
            return Err(OrderError::UnknownItem { id: from_id }.into());
        }
        if !self.catalog.contains(to_id) {
            return Err(OrderError::UnknownItem { id: to_id }.into());
        }

        self.extend_order(from_id.max(to_id));
        let order = self.order_mut()?;
        order.move_item(from_id, to_id)?;
        debug!(from_id, to_id, "item moved");
        Ok(())
    }

    /// Replace the custom order with `new_order` plus every previously-held
    /// id not named in it, in prior relative order. Returns the new length.
    pub fn replace_order(&mut self, new_order: Vec<ItemId>) -> Result<usize> {
        if new_order.is_empty() {
            return Err(OrderError::EmptyOrder.into());
        }
        if let Some(&bad) = new_order.iter().find(|&&id| !self.catalog.contains(id)) {
            return Err(OrderError::UnknownItem { id: bad }.into());
        }

        let max_needed = new_order.iter().copied().max().unwrap_or(0);
        self.extend_order(max_needed);
        let order = self.order_mut()?;
        order.replace(new_order);
        let len = order.len();
        info!(len, "custom order replaced");
        Ok(len)
    }

    fn order_mut(&mut self) -> Result<&mut CustomOrder> {
        self.order
            .as_mut()
            .ok_or_else(|| ListError::Internal("custom order missing after extension".to_string()))
    }

    // ==================== Selection ====================

    /// Replace the whole selection; returns the new size
    pub fn set_selection(&mut self, ids: Vec<ItemId>) -> usize {
        let count = self.selection.replace(ids);
        debug!(count, "selection replaced");
        count
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    // ==================== Settings Snapshot ====================

    /// Transport view for the settings endpoint: sorted selected ids and the
    /// custom order truncated to the transport cap (`None` before first
    /// initialization).
    pub fn settings_snapshot(&self) -> (Vec<ItemId>, Option<Vec<ItemId>>) {
        let order = self
            .order
            .as_ref()
            .map(|order| order.truncated(self.config.transport_order_cap));
        (self.selection.ids_sorted(), order)
    }
}

fn clamp_to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}
