//! Settle-up Group Models

use serde::{Deserialize, Serialize};

/// A settlement group: a set of users who split expenses together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// A member of a settlement group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupUser {
    pub id: i64,
    pub name: String,
}
