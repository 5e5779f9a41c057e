//! Domain models

mod assignment;
mod group;
mod receipt;
mod transaction;

pub use assignment::{Assignment, AssignmentMap};
pub use group::{Group, GroupUser};
pub use receipt::{ReceiptItem, ReceiptParseResult};
pub use transaction::{SettlementPayload, TransactionResponse, UserCost};
