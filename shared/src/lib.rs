//! Shared types for the Warikan settle-up client
//!
//! Common types used across the client and flow crates: receipt line
//! items, settle-up groups and users, the settlement payload, the
//! assignment map, and the pure cost-splitting computation.

pub mod models;
pub mod parse;
pub mod response;
pub mod settle;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Assignment, AssignmentMap, Group, GroupUser, ReceiptItem, ReceiptParseResult,
    SettlementPayload, TransactionResponse, UserCost,
};
pub use response::ListResponse;
pub use settle::{CostSplit, SettleError};
