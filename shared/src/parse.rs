//! Lenient parsing for user-edited numeric text fields
//!
//! Editing-screen inputs arrive as raw text. An empty or non-numeric
//! field always parses to 0 and negative input is clamped to 0 — edits
//! never produce an error or a negative stored value.

/// Parse a currency amount, defaulting to 0.0
pub fn parse_amount(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0).max(0.0)
}

/// Parse a quantity, defaulting to 0
pub fn parse_count(text: &str) -> i32 {
    text.trim().parse::<i32>().unwrap_or(0).max(0)
}

/// Parse a tax percentage, defaulting to 0.0
pub fn parse_percent(text: &str) -> f64 {
    parse_amount(text)
}
