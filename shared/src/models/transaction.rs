//! Settlement transaction payload
//!
//! Wire schema for `POST /api/v1/settle-up/transactions/`. A payload is
//! built once at sync time and never mutated afterwards; retries resend
//! the identical payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user cost breakdown entry
///
/// Users with a zero attributed cost are omitted from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserCost {
    pub user_id: i64,
    pub amount: f64,
}

/// Settlement transaction sent to the settle-up backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPayload {
    /// Free-text purpose shown in the group's transaction history
    pub purpose: String,
    /// Group the settlement belongs to
    pub group_id: i64,
    /// Member who physically paid the receipt
    pub paying_member_id: i64,
    /// Tax percentage applied on top of the item subtotal
    pub tax_percentage: f64,
    /// Receipt total; server-authoritative when the receipt was
    /// uploaded, otherwise the locally computed subtotal + tax
    pub total_amount: f64,
    /// Per-user cost breakdown, zero-cost users omitted
    pub member_costs: Vec<UserCost>,
    /// Line totals of shared items, pooled rather than attributed
    pub split_receipt_items: Vec<f64>,
    /// Date printed on the receipt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_date: Option<NaiveDate>,
    /// URL of the uploaded receipt image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_image_url: Option<String>,
}

/// Response body of a successful transaction POST
///
/// Any 2xx response counts as success; the body is parsed best-effort.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TransactionResponse {
    #[serde(default)]
    pub id: Option<i64>,
}
