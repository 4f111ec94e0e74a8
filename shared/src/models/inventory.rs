//! Inventory models mirroring the turbo backend's wire format
//!
//! The backend stores one record per stock-keeping lot. A lot either carries a
//! flat list of part numbers sharing one quantity, or big/small size variants
//! with their own part numbers and quantities.

use serde::{Deserialize, Serialize};

/// A stocked lot as returned by `GET /turbos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurboLot {
    pub location: String,
    /// Shared quantity for the lot; absent when size variants are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// One or more part numbers sharing the quantity and location above.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_numbers: Option<Vec<String>>,
    pub has_size_option: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_variants: Option<SizeVariants>,
    /// Priority lots use a relaxed low-stock threshold.
    #[serde(default)]
    pub priority: bool,
}

/// Big/small variant pair for lots with `has_size_option`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeVariants {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big: Option<SizeVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<SizeVariant>,
}

/// A single size variant: its part numbers and their shared quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeVariant {
    pub part_numbers: Vec<String>,
    pub quantity: i64,
}

/// Aggregate counts from `GET /turbos/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: i64,
    pub low_stock_items: i64,
    pub total_quantity: i64,
}

/// One card on the dashboard, derived from a [`TurboLot`].
///
/// Rows are pure view state: the full list is rebuilt from a fresh fetch on
/// every refresh and never patched in place. The `id` is the comma-joined set
/// of part numbers, which makes it stable across fetches of the same lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: String,
    pub model: String,
    pub display_text: String,
    pub location: String,
    pub quantity: i64,
    pub is_low_stock: bool,
    pub priority: bool,
    pub all_part_numbers: Vec<String>,
    pub big_part_numbers: Vec<String>,
    pub small_part_numbers: Vec<String>,
    pub big_quantity: i64,
    pub small_quantity: i64,
}

impl DisplayRow {
    /// The single backend-addressable part number for this row.
    ///
    /// Update, delete, sell and mark-arrived all identify a lot by its first
    /// part number. Multi-part-number lots therefore cannot be mutated through
    /// a specific sub-part; this helper is the one place encoding that rule.
    pub fn primary_part_number(&self) -> Option<&str> {
        self.all_part_numbers.first().map(String::as_str)
    }
}
