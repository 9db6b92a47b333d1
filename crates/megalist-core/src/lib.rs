//! Megalist Core - ordering and pagination engine for a huge item list
//!
//! This crate provides the core functionality for the megalist service:
//!
//! - **Catalog**: immutable, densely-id-indexed virtual dataset with O(1)
//!   lookup and derived values — the full list is never materialized
//! - **Order**: user-defined display order, lazily initialized to an id
//!   prefix and extended in contiguous batches as mutations reach past it
//! - **Selection**: wholesale-replaceable set of selected item ids
//! - **Engine**: windowed order walk, search merge, catalog-order backfill,
//!   pagination, and the move/replace order mutations
//! - **Config**: catalog size, materialization windows, and paging defaults
//!
//! # Architecture
//!
//! `ListState` is the aggregate root. The catalog is read-only after
//! construction; the custom order and selection mutate only through
//! `ListState` operations, which are written to be serialized by the caller
//! (one read-modify-write at a time). Retrieval walks only the visible
//! region of the custom order and backfills the remainder in catalog order,
//! so a page against a million-item catalog stays cheap while totals remain
//! exact.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod order;
pub mod selection;

pub use catalog::{Catalog, Item, ItemId};
pub use config::{ConfigError, ListConfig};
pub use engine::{ListState, PageItem, PageRequest, PageResult};
pub use error::{ListError, OrderError, Result};
pub use order::CustomOrder;
pub use selection::SelectionStore;
