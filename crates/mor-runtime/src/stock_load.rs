use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use mor_db::{catalog_summary, upsert_stock, zero_all_quantities, CatalogSummary, UpsertOutcome};
use mor_feed::{locate_single_file, open_stock_extract};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::consume_input;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StockLoadSummary {
    pub source: PathBuf,
    /// Entries whose quantity was reset to 0 before applying the extract.
    pub zeroed: u64,
    pub loaded: u64,
    pub created: u64,
    pub updated: u64,
    /// Rows the extract source could not parse.
    pub rows_rejected: u64,
    /// Parsed rows the catalog refused (e.g. negative quantity).
    pub rows_failed: u64,
}

/// Apply the stock extract in `stock_dir` to the catalog.
///
/// Quantities are zeroed first: the extract omits zero-stock items, so an
/// item missing from the file is out of stock.
pub async fn load_stock(pool: &SqlitePool, stock_dir: &Path) -> Result<StockLoadSummary> {
    let path = locate_single_file(stock_dir).context("stock extract lookup failed")?;
    info!(path = %path.display(), "stock load start");

    let mut source = open_stock_extract(&path)
        .with_context(|| format!("open stock extract failed: {}", path.display()))?;

    let mut summary = StockLoadSummary {
        source: path.clone(),
        ..Default::default()
    };

    let mut tx = pool.begin().await.context("begin stock load tx failed")?;

    summary.zeroed = zero_all_quantities(&mut *tx).await?;

    for rec in source.by_ref() {
        match upsert_stock(&mut *tx, &rec.code, rec.quantity, rec.price).await {
            Ok(UpsertOutcome::Created) => {
                summary.loaded += 1;
                summary.created += 1;
            }
            Ok(UpsertOutcome::Updated) => {
                summary.loaded += 1;
                summary.updated += 1;
            }
            Err(err) => {
                warn!(
                    code = %rec.code,
                    quantity = rec.quantity,
                    price = rec.price,
                    error = %format!("{err:#}"),
                    "stock record not applied"
                );
                summary.rows_failed += 1;
            }
        }
    }

    let stats = source.stats();
    summary.rows_rejected = stats.rows_rejected;
    if let Some(e) = &stats.io_error {
        // tx is dropped here: nothing from this pass is committed.
        bail!("stock extract read failed: {}: {e}", path.display());
    }

    tx.commit().await.context("commit stock load tx failed")?;
    consume_input(&path)?;

    info!(
        loaded = summary.loaded,
        created = summary.created,
        updated = summary.updated,
        rejected = summary.rows_rejected,
        failed = summary.rows_failed,
        "stock load done"
    );

    // The pass is already committed; a summary failure must not fail it.
    match summarize(pool).await {
        Ok(cs) => log_catalog_summary(&cs),
        Err(err) => warn!(error = %format!("{err:#}"), "catalog summary unavailable"),
    }

    Ok(summary)
}

async fn summarize(pool: &SqlitePool) -> Result<CatalogSummary> {
    let mut conn = pool.acquire().await.context("acquire connection failed")?;
    catalog_summary(&mut conn).await
}

fn log_catalog_summary(cs: &CatalogSummary) {
    info!(
        entries = cs.entries,
        listed = cs.listed,
        listed_pieces = cs.listed_pieces,
        listed_out_of_stock = cs.listed_out_of_stock,
        unlisted_in_stock = cs.unlisted_in_stock,
        unlisted_pieces = cs.unlisted_pieces,
        "catalog summary"
    );
}
