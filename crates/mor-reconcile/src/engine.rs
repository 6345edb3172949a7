use crate::{Assessment, ListedState, ReconcileNotice, StoredState, MICROS_SCALE, PRICE_TOLERANCE};

/// Price in integer micros, rounded to nearest.
pub fn to_micros(price: f64) -> i64 {
    (price * MICROS_SCALE).round() as i64
}

/// True when the two prices differ by strictly more than [`PRICE_TOLERANCE`].
///
/// Compared in micros so that a difference of exactly 0.05 stays in band
/// regardless of binary float representation (0.08 - 0.03 != 0.05 in f64).
/// Micros saturate at the i64 bounds; the delta is taken in i128 so extreme
/// prices compare as drifted instead of overflowing.
pub fn price_drifted(stored: f64, listed: f64) -> bool {
    let delta = (i128::from(to_micros(stored)) - i128::from(to_micros(listed))).abs();
    delta > i128::from(to_micros(PRICE_TOLERANCE))
}

/// Compare one catalog entry against its marketplace listing.
pub fn assess(stored: &StoredState, listed: &ListedState) -> Assessment {
    Assessment {
        quantity_dirty: stored.quantity != listed.quantity,
        price_dirty: price_drifted(stored.price, listed.price),
    }
}

/// Informational notices for one listing row.
///
/// `known` is whether the listing's code exists in the catalog. The
/// out-of-stock-control notice is independent of the match.
pub fn notices_for(
    listing_id: &str,
    code: &str,
    known: bool,
    out_of_stock_control: bool,
) -> Vec<ReconcileNotice> {
    let mut out = Vec::new();

    if !known {
        out.push(ReconcileNotice::UnknownListing {
            listing_id: listing_id.to_string(),
            code: code.to_string(),
        });
    }

    if !out_of_stock_control {
        out.push(ReconcileNotice::OutOfStockControlDisabled {
            listing_id: listing_id.to_string(),
            code: code.to_string(),
        });
    }

    out
}
