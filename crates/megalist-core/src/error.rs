//! Error types for megalist-core

use thiserror::Error;

use crate::catalog::ItemId;

/// Result type alias for list operations
pub type Result<T> = std::result::Result<T, ListError>;

/// Main error type for list operations
#[derive(Error, Debug)]
pub enum ListError {
    /// Custom-order errors
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Malformed request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store inconsistency that should not occur in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Custom-order specific errors
#[derive(Error, Debug)]
pub enum OrderError {
    /// Referenced id is not a catalog id
    #[error("Item not found in catalog: {id}")]
    UnknownItem { id: ItemId },

    /// Ids could not be located in the custom order after extension
    #[error(
        "Items not found in custom order: from {from_id} (index {from_index:?}), \
         to {to_id} (index {to_index:?})"
    )]
    NotInOrder {
        from_id: ItemId,
        to_id: ItemId,
        from_index: Option<usize>,
        to_index: Option<usize>,
    },

    /// Replacement order was empty
    #[error("Replacement order must not be empty")]
    EmptyOrder,
}
