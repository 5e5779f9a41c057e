//! Item-to-user assignment map
//!
//! Records which group member each receipt line item belongs to, or
//! that the item is shared by the whole group. The map does not own
//! items or users — it only records the relation by item index, and it
//! must be cleared whenever the group selection changes.

use std::collections::HashMap;

/// Who a receipt line item is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Attributed to a single group member
    User(i64),
    /// Pooled by the whole group, reported separately rather than
    /// split per user
    Shared,
}

/// Mapping from item index to its assignment
#[derive(Debug, Clone, Default)]
pub struct AssignmentMap {
    entries: HashMap<usize, Assignment>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an item to a user or mark it shared
    pub fn assign(&mut self, item_index: usize, assignment: Assignment) {
        self.entries.insert(item_index, assignment);
    }

    /// Remove the assignment for an item
    pub fn unassign(&mut self, item_index: usize) {
        self.entries.remove(&item_index);
    }

    pub fn get(&self, item_index: usize) -> Option<Assignment> {
        self.entries.get(&item_index).copied()
    }

    /// True when every item index in `0..item_count` has an assignment
    pub fn is_complete(&self, item_count: usize) -> bool {
        (0..item_count).all(|i| self.entries.contains_key(&i))
    }

    /// First item index without an assignment, if any
    pub fn first_unassigned(&self, item_count: usize) -> Option<usize> {
        (0..item_count).find(|i| !self.entries.contains_key(i))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all assignments
    ///
    /// Called as an explicit invalidation step when the group selection
    /// changes: the old user ids are meaningless in the new group.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
