use anyhow::{Context, Result};
use mor_db::CatalogSummary;
use mor_reconcile::ReconcileReport;
use mor_runtime::{ExportSummary, RevisionKind, StockLoadSummary};

use super::PassContext;

pub async fn load_stock(ctx: &PassContext) -> Result<()> {
    let s = mor_runtime::load_stock(&ctx.pool, &ctx.config().paths.stock_dir).await?;
    print_stock(&s);
    print_catalog(ctx).await
}

pub async fn link_check(ctx: &PassContext) -> Result<()> {
    let r = mor_runtime::link_check(&ctx.pool, &ctx.config().paths.report_dir).await?;
    print_reconcile(&r)
}

pub async fn export(ctx: &PassContext, kind: RevisionKind) -> Result<()> {
    let cfg = ctx.config();
    let s = mor_runtime::export_revisions(
        &ctx.pool,
        kind,
        &cfg.paths.data_dir,
        &cfg.export.action_marker,
    )
    .await?;
    print_export(&s);
    Ok(())
}

pub async fn cycle(ctx: &PassContext) -> Result<()> {
    let c = mor_runtime::run_cycle(&ctx.pool, ctx.config()).await?;
    print_stock(&c.stock);
    print_reconcile(&c.reconcile)?;
    print_export(&c.quantity);
    print_export(&c.price);
    print_catalog(ctx).await
}

fn print_stock(s: &StockLoadSummary) {
    println!("stock_source={}", s.source.display());
    println!(
        "stock_loaded={} created={} updated={} rejected={} failed={}",
        s.loaded, s.created, s.updated, s.rows_rejected, s.rows_failed
    );
}

fn print_reconcile(r: &ReconcileReport) -> Result<()> {
    println!(
        "listings={} matched={} quantity_flagged={} price_flagged={} rejected={} failed={}",
        r.listings_read, r.matched, r.quantity_flagged, r.price_flagged, r.rows_rejected, r.rows_failed
    );
    for n in &r.notices {
        let line = serde_json::to_string(n).context("serialize notice failed")?;
        println!("notice={line}");
    }
    Ok(())
}

fn print_export(s: &ExportSummary) {
    println!(
        "export={} file={} rows_written={} rows_skipped={}",
        s.kind,
        s.path.display(),
        s.rows_written,
        s.rows_skipped
    );
}

async fn print_catalog(ctx: &PassContext) -> Result<()> {
    let mut conn = ctx.pool.acquire().await.context("acquire connection failed")?;
    let cs: CatalogSummary = mor_db::catalog_summary(&mut conn).await?;
    println!(
        "catalog_entries={} listed={} listed_pieces={} listed_out_of_stock={} unlisted_in_stock={} unlisted_pieces={}",
        cs.entries,
        cs.listed,
        cs.listed_pieces,
        cs.listed_out_of_stock,
        cs.unlisted_in_stock,
        cs.unlisted_pieces
    );
    Ok(())
}
