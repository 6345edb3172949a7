use serde::Serialize;

/// Micros scale (1e-6) used to compare prices without float noise.
pub const MICROS_SCALE: f64 = 1_000_000.0;

/// Largest price difference (in currency units) still considered "in sync".
pub const PRICE_TOLERANCE: f64 = 0.05;

/// What the catalog currently believes about an item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoredState {
    pub quantity: i64,
    pub price: f64,
}

/// What the marketplace currently shows for the same item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListedState {
    pub quantity: i64,
    pub price: f64,
}

/// Which pushes an item needs after comparing the two sides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub quantity_dirty: bool,
    pub price_dirty: bool,
}

impl Assessment {
    pub fn in_sync(&self) -> bool {
        !self.quantity_dirty && !self.price_dirty
    }
}

/// Informational findings of a reconciliation pass. None of these change
/// catalog state by themselves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconcileNotice {
    /// Listed on the marketplace, unknown to the catalog.
    UnknownListing { listing_id: String, code: String },
    /// The marketplace will auto-delist this item when it hits zero stock.
    OutOfStockControlDisabled { listing_id: String, code: String },
}

/// Outcome of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub listings_read: u64,
    pub matched: u64,
    pub quantity_flagged: u64,
    pub price_flagged: u64,
    /// Rows the report source could not parse.
    pub rows_rejected: u64,
    /// Parsed rows that failed while being applied.
    pub rows_failed: u64,
    /// Catalog entries that lost their link in the reset step.
    pub entries_reset: u64,
    /// In report order.
    pub notices: Vec<ReconcileNotice>,
}

impl ReconcileReport {
    pub fn unknown_listings(&self) -> usize {
        self.notices
            .iter()
            .filter(|n| matches!(n, ReconcileNotice::UnknownListing { .. }))
            .count()
    }

    pub fn out_of_stock_control_disabled(&self) -> usize {
        self.notices
            .iter()
            .filter(|n| matches!(n, ReconcileNotice::OutOfStockControlDisabled { .. }))
            .count()
    }
}
