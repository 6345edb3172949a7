use anyhow::Result;
use mor_config::MorConfig;
use mor_reconcile::ReconcileReport;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::{export_revisions, link_check, load_stock, ExportSummary, RevisionKind, StockLoadSummary};

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub stock: StockLoadSummary,
    pub reconcile: ReconcileReport,
    pub quantity: ExportSummary,
    pub price: ExportSummary,
}

/// Stock load, link check, quantity export, price export. Stops at the first
/// failing pass; earlier passes stay committed.
pub async fn run_cycle(pool: &SqlitePool, cfg: &MorConfig) -> Result<CycleReport> {
    let stock = load_stock(pool, &cfg.paths.stock_dir).await?;
    let reconcile = link_check(pool, &cfg.paths.report_dir).await?;

    let marker = cfg.export.action_marker.as_str();
    let quantity = export_revisions(pool, RevisionKind::Quantity, &cfg.paths.data_dir, marker).await?;
    let price = export_revisions(pool, RevisionKind::Price, &cfg.paths.data_dir, marker).await?;

    info!(
        quantity_file = %quantity.path.display(),
        price_file = %price.path.display(),
        "cycle done"
    );

    Ok(CycleReport {
        stock,
        reconcile,
        quantity,
        price,
    })
}
