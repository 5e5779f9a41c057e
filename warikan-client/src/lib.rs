//! Warikan Client - HTTP client for the settle-up backend
//!
//! Provides network-based HTTP calls to the settle-up API: group and
//! user listing, settlement transaction posting with bounded retry, and
//! receipt image upload.

pub mod config;
pub mod error;
pub mod http;
pub mod retry;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use retry::{RetryPolicy, retry_with_backoff};

// Re-export shared types for convenience
pub use shared::{Group, GroupUser, ListResponse, ReceiptParseResult, TransactionResponse};
