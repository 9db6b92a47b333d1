//! The mutable custom display order

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::catalog::ItemId;
use crate::error::OrderError;

/// How far the degraded-path probe searches around a vanished move target.
const NEIGHBOR_PROBE_RANGE: ItemId = 10;

/// User-defined display sequence of item ids, distinct from natural id order.
///
/// Invariants:
/// - no duplicate ids;
/// - `positions` maps every held id to its current index;
/// - `max_id` is the largest held id (0 when empty);
/// - membership only grows — a move removes and reinserts the same id.
///
/// The reverse index keeps `contains` and `position` O(1); splices repair the
/// shifted range.
#[derive(Debug, Clone, Default)]
pub struct CustomOrder {
    ids: Vec<ItemId>,
    positions: HashMap<ItemId, usize>,
    max_id: ItemId,
}

impl CustomOrder {
    /// Create an order covering the contiguous id prefix `1..=k`
    pub fn with_prefix(k: ItemId) -> Self {
        let ids: Vec<ItemId> = (1..=k).collect();
        let positions = ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
        Self {
            ids,
            positions,
            max_id: k,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Current index of `id`, if held
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Largest id currently held
    pub fn max_id(&self) -> ItemId {
        self.max_id
    }

    /// The ordered id sequence
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    /// First `cap` ids, for transport
    pub fn truncated(&self, cap: usize) -> Vec<ItemId> {
        self.ids.iter().take(cap).copied().collect()
    }

    /// Extend the order so `max_needed` is covered, appending the contiguous
    /// catalog range `(max_id, max_needed]` in ascending batches. Ids already
    /// covered (present, or below the current maximum) are a no-op. Returns
    /// whether anything was appended.
    ///
    /// Batching only bounds per-step work; the end state is identical to a
    /// single contiguous append.
    pub fn extend_to(&mut self, max_needed: ItemId, catalog_len: u64, batch: usize) -> bool {
        if self.contains(max_needed) || max_needed <= self.max_id {
            return false;
        }
        let target = max_needed.min(catalog_len);
        if target <= self.max_id {
            return false;
        }

        let batch = batch.max(1) as u64;
        let mut next = self.max_id + 1;
        while next <= target {
            let end = (next + batch - 1).min(target);
            self.ids.reserve((end - next + 1) as usize);
            for id in next..=end {
                self.positions.insert(id, self.ids.len());
                self.ids.push(id);
            }
            next = end + 1;
        }
        self.max_id = target;
        true
    }

    /// Move `from` relative to `to`: dropping an item while dragging forward
    /// lands after the target, dragging backward lands before it.
    pub fn move_item(&mut self, from: ItemId, to: ItemId) -> Result<(), OrderError> {
        let from_index = self.position(from);
        let to_index = self.position(to);
        let (Some(from_index), Some(to_index)) = (from_index, to_index) else {
            return Err(OrderError::NotInOrder {
                from_id: from,
                to_id: to,
                from_index,
                to_index,
            });
        };

        self.remove_at(from_index);

        let insert_index = match self.position(to) {
            // Forward drag: land after the target's post-removal position.
            Some(new_to) if from_index < to_index => new_to + 1,
            Some(new_to) => new_to,
            // Degraded path: the target cannot vanish while membership is
            // unchanged, but if the index were ever broken, fall back to the
            // nearest surviving neighbor (then to the front).
            None => {
                warn!(to_id = to, "move target missing after removal, probing neighbors");
                self.nearest_neighbor_index(to).unwrap_or(0)
            }
        };

        self.insert_at(insert_index, from);
        Ok(())
    }

    /// Replace the sequence with `explicit` followed by every currently-held
    /// id not named in it, in prior relative order. Duplicates in `explicit`
    /// keep their first occurrence. Nothing previously held is dropped.
    pub fn replace(&mut self, explicit: Vec<ItemId>) {
        let named: HashSet<ItemId> = explicit.iter().copied().collect();
        let mut merged = explicit;
        for &id in &self.ids {
            if !named.contains(&id) {
                merged.push(id);
            }
        }

        self.ids.clear();
        self.positions.clear();
        self.max_id = 0;
        let mut seen = HashSet::with_capacity(merged.len());
        for id in merged {
            if seen.insert(id) {
                self.positions.insert(id, self.ids.len());
                self.ids.push(id);
                if id > self.max_id {
                    self.max_id = id;
                }
            }
        }
    }

    fn remove_at(&mut self, index: usize) -> ItemId {
        let id = self.ids.remove(index);
        self.positions.remove(&id);
        for pos in index..self.ids.len() {
            self.positions.insert(self.ids[pos], pos);
        }
        id
    }

    fn insert_at(&mut self, index: usize, id: ItemId) {
        let index = index.min(self.ids.len());
        self.ids.insert(index, id);
        for pos in index..self.ids.len() {
            self.positions.insert(self.ids[pos], pos);
        }
        if id > self.max_id {
            self.max_id = id;
        }
    }

    /// Index of the nearest held id within `NEIGHBOR_PROBE_RANGE` of `around`
    fn nearest_neighbor_index(&self, around: ItemId) -> Option<usize> {
        for offset in 1..=NEIGHBOR_PROBE_RANGE {
            if let Some(pos) = self.position(around + offset) {
                return Some(pos);
            }
            if around > offset {
                if let Some(pos) = self.position(around - offset) {
                    return Some(pos);
                }
            }
        }
        None
    }
}
