//! mor-reconcile
//!
//! Catalog vs. marketplace-listing comparison.
//!
//! Decisions:
//! - Quantity drift is exact: any difference raises the quantity flag.
//! - Price drift uses a tolerance band (feeds round differently); only a
//!   difference strictly greater than 0.05 raises the price flag.
//! - A listing whose code is not in the catalog is reported, never fatal.
//! - A listing with out-of-stock control disabled is reported, no state change.
//!
//! Deterministic, pure logic. No IO. No database calls.

mod engine;
mod types;

pub use engine::{assess, notices_for, price_drifted, to_micros};
pub use types::*;
