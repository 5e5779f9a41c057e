//! Receipt Models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single line item extracted from a receipt
///
/// Names come from the OCR service in both English and Japanese; at
/// least one of the two is non-empty. Cost and quantity are clamped to
/// zero on every edit, so totals can never go negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptItem {
    /// English item name (may be empty)
    #[serde(default)]
    pub name_english: String,
    /// Japanese item name (may be empty)
    #[serde(default)]
    pub name_japanese: String,
    /// Display sort order on the editing screen
    pub order: i32,
    /// Unit cost in currency units
    pub cost: f64,
    /// Quantity
    pub quantity: i32,
}

impl ReceiptItem {
    /// Create a new item, clamping cost and quantity to zero
    pub fn new(
        name_english: impl Into<String>,
        name_japanese: impl Into<String>,
        order: i32,
        cost: f64,
        quantity: i32,
    ) -> Self {
        Self {
            name_english: name_english.into(),
            name_japanese: name_japanese.into(),
            order,
            cost: cost.max(0.0),
            quantity: quantity.max(0),
        }
    }

    /// Name to show on the editing screen: English if present, else Japanese
    pub fn display_name(&self) -> &str {
        if self.name_english.is_empty() {
            &self.name_japanese
        } else {
            &self.name_english
        }
    }

    /// Line total for this item
    pub fn line_total(&self) -> f64 {
        self.cost * self.quantity as f64
    }
}

/// Result of uploading a receipt image to the OCR/parsing service
///
/// Carried as JSON in navigation parameters between the capture screen
/// and the editing screen. The `total` is server-authoritative: when
/// present, the editing screen displays it verbatim and never
/// recomputes it from local edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReceiptParseResult {
    /// Extracted line items
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
    /// Server-computed receipt total
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    /// Date printed on the receipt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_date: Option<NaiveDate>,
    /// URL of the stored receipt image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ReceiptParseResult {
    /// Parse a navigation-carried JSON payload
    ///
    /// Malformed payloads fall back to the built-in sample dataset so
    /// the editing screen always has something to show.
    pub fn from_navigation(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Failed to parse navigation payload, using sample data: {e}");
                Self::sample()
            }
        }
    }

    /// Built-in sample dataset used when no parse result is available
    pub fn sample() -> Self {
        Self {
            items: vec![
                ReceiptItem::new("Draft Beer", "生ビール", 0, 580.0, 2),
                ReceiptItem::new("Edamame", "枝豆", 1, 380.0, 1),
                ReceiptItem::new("Fried Chicken", "唐揚げ", 2, 680.0, 1),
            ],
            total: None,
            receipt_date: None,
            image_url: None,
        }
    }
}
