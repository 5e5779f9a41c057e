//! Settlement calculator
//!
//! Pure money arithmetic over receipt line items: subtotal, tax, and
//! the per-user cost split. Amounts stay as f64 throughout the
//! computation; rounding to whole yen happens only at display time.

use crate::models::{Assignment, AssignmentMap, ReceiptItem, UserCost};
use thiserror::Error;

/// Pre-sync validation errors
///
/// Checked in declaration order before any network call; each carries
/// its own user-facing message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettleError {
    /// No settlement group has been selected
    #[error("Select a group before syncing")]
    NoGroupSelected,

    /// No paying member has been selected
    #[error("Select who paid the receipt")]
    NoPayerSelected,

    /// A receipt item has no user or shared assignment
    #[error("Item {index} is not assigned to anyone")]
    UnassignedItem { index: usize },

    /// Nothing would be settled: no per-user costs and no shared items
    #[error("Assign at least one item before syncing")]
    NothingToSettle,
}

/// Result of splitting item costs across assignments
#[derive(Debug, Clone, PartialEq)]
pub struct CostSplit {
    /// Per-user totals, zero-cost users omitted, ordered by first
    /// appearance in the item list
    pub per_user: Vec<UserCost>,
    /// Line totals of shared items, in item order
    pub shared_items: Vec<f64>,
}

/// Sum of `cost * quantity` across all items
pub fn subtotal(items: &[ReceiptItem]) -> f64 {
    items.iter().map(ReceiptItem::line_total).sum()
}

/// Tax on a subtotal at the given percentage
pub fn tax_amount(subtotal: f64, tax_percentage: f64) -> f64 {
    subtotal * tax_percentage / 100.0
}

/// Locally computed total: subtotal plus tax
///
/// Only displayed when the upload response carried no
/// server-authoritative total.
pub fn local_total(subtotal: f64, tax: f64) -> f64 {
    subtotal + tax
}

/// Round an amount to whole yen for display
pub fn round_to_yen(amount: f64) -> i64 {
    amount.round() as i64
}

/// Format an amount as a yen string for display
pub fn format_yen(amount: f64) -> String {
    format!("¥{}", round_to_yen(amount))
}

/// Split item costs across their assignments
///
/// Items assigned to a user add `cost * quantity` to that user's
/// running total; shared items are pooled in a separate list instead of
/// being attributed to anyone. Fails on the first unassigned item.
pub fn split_costs(
    items: &[ReceiptItem],
    assignments: &AssignmentMap,
) -> Result<CostSplit, SettleError> {
    let mut per_user: Vec<UserCost> = Vec::new();
    let mut shared_items = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match assignments.get(index) {
            Some(Assignment::User(user_id)) => {
                match per_user.iter_mut().find(|c| c.user_id == user_id) {
                    Some(cost) => cost.amount += item.line_total(),
                    None => per_user.push(UserCost {
                        user_id,
                        amount: item.line_total(),
                    }),
                }
            }
            Some(Assignment::Shared) => shared_items.push(item.line_total()),
            None => return Err(SettleError::UnassignedItem { index }),
        }
    }

    // Zero-cost users are dropped from the breakdown sent to the server
    per_user.retain(|c| c.amount > 0.0);

    Ok(CostSplit {
        per_user,
        shared_items,
    })
}
