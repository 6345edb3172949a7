use std::path::Path;

use anyhow::{bail, Context, Result};
use mor_db::{apply_listing, fetch_entry, reset_listing_state};
use mor_feed::{locate_single_file, open_listing_report, ListingRecord};
use mor_reconcile::{assess, notices_for, ListedState, ReconcileNotice, ReconcileReport, StoredState};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::consume_input;

/// Align the catalog with the listing report in `report_dir`.
///
/// Every entry is unlinked and unflagged first, so after commit the listing
/// ids and dirty flags describe exactly this snapshot.
pub async fn link_check(pool: &SqlitePool, report_dir: &Path) -> Result<ReconcileReport> {
    let path = locate_single_file(report_dir).context("listing report lookup failed")?;
    info!(path = %path.display(), "link check start");

    let mut source = open_listing_report(&path)
        .with_context(|| format!("open listing report failed: {}", path.display()))?;

    let mut report = ReconcileReport::default();

    let mut tx = pool.begin().await.context("begin link check tx failed")?;

    report.entries_reset = reset_listing_state(&mut *tx).await?;

    for rec in source.by_ref() {
        report.listings_read += 1;
        if let Err(err) = apply_record(&mut *tx, &rec, &mut report).await {
            warn!(
                listing_id = %rec.listing_id,
                code = %rec.code,
                quantity = rec.quantity,
                price = rec.price,
                error = %format!("{err:#}"),
                "listing record not applied"
            );
            report.rows_failed += 1;
        }
    }

    let stats = source.stats();
    report.rows_rejected = stats.rows_rejected;
    if let Some(e) = &stats.io_error {
        bail!("listing report read failed: {}: {e}", path.display());
    }

    tx.commit().await.context("commit link check tx failed")?;
    consume_input(&path)?;

    info!(
        listings = report.listings_read,
        matched = report.matched,
        quantity_flagged = report.quantity_flagged,
        price_flagged = report.price_flagged,
        unknown = report.unknown_listings(),
        oosc_disabled = report.out_of_stock_control_disabled(),
        rejected = report.rows_rejected,
        failed = report.rows_failed,
        "link check done"
    );

    Ok(report)
}

async fn apply_record(
    conn: &mut SqliteConnection,
    rec: &ListingRecord,
    report: &mut ReconcileReport,
) -> Result<()> {
    let entry = fetch_entry(conn, &rec.code).await?;

    for notice in notices_for(
        &rec.listing_id,
        &rec.code,
        entry.is_some(),
        rec.out_of_stock_control,
    ) {
        match &notice {
            ReconcileNotice::UnknownListing { listing_id, code } => {
                info!(%listing_id, %code, "listing not in catalog")
            }
            ReconcileNotice::OutOfStockControlDisabled { listing_id, code } => {
                info!(%listing_id, %code, "out-of-stock control disabled")
            }
        }
        report.notices.push(notice);
    }

    let Some(entry) = entry else {
        return Ok(());
    };

    let a = assess(
        &StoredState {
            quantity: entry.quantity,
            price: entry.price,
        },
        &ListedState {
            quantity: rec.quantity,
            price: rec.price,
        },
    );

    apply_listing(conn, &rec.code, &rec.listing_id, a.quantity_dirty, a.price_dirty).await?;

    report.matched += 1;
    if a.quantity_dirty {
        report.quantity_flagged += 1;
    }
    if a.price_dirty {
        report.price_flagged += 1;
    }
    Ok(())
}
