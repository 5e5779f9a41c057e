//! API response types
//!
//! The settle-up backend wraps every list endpoint in the same
//! `{ items, count }` envelope.

use serde::{Deserialize, Serialize};

/// List response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub count: u64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        let count = items.len() as u64;
        Self { items, count }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Last item in the list
    ///
    /// The editing screen defaults the group selection to the last
    /// returned group.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}
