//! mor-runtime
//!
//! The four catalog passes and the cycle that runs them in order.
//!
//! Every pass follows the same discipline:
//! - locate its input (fatal if missing or ambiguous)
//! - stage all catalog mutations in one `sqlx::Transaction`
//! - commit exactly once at the end
//! - only then consume (delete) the input file
//!
//! A pass that fails before commit leaves the catalog and its input file
//! untouched, so it can simply be re-run.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

mod cycle;
mod export;
mod link_check;
mod stock_load;

pub use cycle::{run_cycle, CycleReport};
pub use export::{export_revisions, format_price, ExportSummary, RevisionKind, PRICE_FLOOR};
pub use link_check::link_check;
pub use stock_load::{load_stock, StockLoadSummary};

/// Delete an input file once its pass has committed.
fn consume_input(path: &Path) -> Result<()> {
    std::fs::remove_file(path)
        .with_context(|| format!("remove consumed input failed: {}", path.display()))?;
    info!(path = %path.display(), "input consumed");
    Ok(())
}
