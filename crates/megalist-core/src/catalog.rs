//! The immutable virtual item catalog

use serde::Serialize;

/// Dense positive item identifier.
pub type ItemId = u64;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub value: String,
}

/// The full, immutable virtual dataset of items.
///
/// Ids are dense in `1..=len`. Values are derived deterministically from the
/// id on demand, so the catalog needs O(1) memory and `get` is O(1) no matter
/// how large the dataset is.
#[derive(Debug, Clone)]
pub struct Catalog {
    len: u64,
}

impl Catalog {
    /// Create a catalog of `len` items with ids `1..=len`
    pub fn new(len: u64) -> Self {
        Self { len }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `id` is a valid catalog id
    pub fn contains(&self, id: ItemId) -> bool {
        id >= 1 && id <= self.len
    }

    fn value_of(id: ItemId) -> String {
        format!("Item {}", id)
    }

    /// Look up an item by id
    pub fn get(&self, id: ItemId) -> Option<Item> {
        self.contains(id).then(|| Item {
            id,
            value: Self::value_of(id),
        })
    }

    /// Case-insensitive substring match over the item value or its decimal
    /// id. `needle` must already be lowercased; an empty needle matches
    /// every item.
    pub fn matches(&self, id: ItemId, needle: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        if needle.is_empty() {
            return true;
        }
        Self::value_of(id).to_lowercase().contains(needle) || id.to_string().contains(needle)
    }

    /// Number of items matching `needle` across the whole catalog
    pub fn count_matches(&self, needle: &str) -> u64 {
        if needle.is_empty() {
            return self.len;
        }
        (1..=self.len).filter(|&id| self.matches(id, needle)).count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_bounded() {
        let catalog = Catalog::new(10);
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(11).is_none());

        let item = catalog.get(7).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.value, "Item 7");
    }

    #[test]
    fn values_are_deterministic() {
        let catalog = Catalog::new(100);
        assert_eq!(catalog.get(42), catalog.get(42));
    }

    #[test]
    fn matches_value_case_insensitively() {
        let catalog = Catalog::new(10);
        // Caller lowercases the needle; "ITEM 3" arrives as "item 3".
        assert!(catalog.matches(3, "item 3"));
        assert!(catalog.matches(3, "tem"));
        assert!(!catalog.matches(3, "item 4"));
    }

    #[test]
    fn matches_id_substring() {
        let catalog = Catalog::new(200);
        assert!(catalog.matches(123, "23"));
        assert!(!catalog.matches(45, "23"));
    }

    #[test]
    fn empty_needle_matches_everything() {
        let catalog = Catalog::new(5);
        assert_eq!(catalog.count_matches(""), 5);
        assert!(catalog.matches(1, ""));
    }

    #[test]
    fn count_matches_scans_full_catalog() {
        let catalog = Catalog::new(30);
        // Ids containing the digit 2: 2, 12, 20..=29.
        assert_eq!(catalog.count_matches("2"), 12);
    }
}
