use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mor_db::{clear_dirty, fetch_pending, next_name, CatalogEntry, DirtyField};
use mor_feed::{DELIMITER, QUOTE};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Prices at or below this are never pushed; their flag is still cleared.
pub const PRICE_FLOOR: f64 = 1.0;

const ROW_ACTION: &str = "Revise";
const ITEM_ID_HEADER: &str = "ItemID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionKind {
    Quantity,
    Price,
}

impl RevisionKind {
    pub fn prefix(self) -> &'static str {
        match self {
            RevisionKind::Quantity => "revise_qty",
            RevisionKind::Price => "revise_prc",
        }
    }

    pub fn value_header(self) -> &'static str {
        match self {
            RevisionKind::Quantity => "*Quantity",
            RevisionKind::Price => "*StartPrice",
        }
    }

    pub fn field(self) -> DirtyField {
        match self {
            RevisionKind::Quantity => DirtyField::Quantity,
            RevisionKind::Price => DirtyField::Price,
        }
    }

    /// Value to push for `entry`, or `None` when it falls under the floor.
    fn value(self, entry: &CatalogEntry) -> Option<String> {
        match self {
            RevisionKind::Quantity => Some(entry.quantity.to_string()),
            RevisionKind::Price if entry.price <= PRICE_FLOOR => None,
            RevisionKind::Price => Some(format_price(entry.price)),
        }
    }
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field().as_str())
    }
}

/// Shortest round-trip decimal, always with a fractional part (`12.0`, `15.99`).
pub fn format_price(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 {
        format!("{price:.1}")
    } else {
        format!("{price}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub kind: RevisionKind,
    pub path: PathBuf,
    pub rows_written: u64,
    /// Entries drained below the price floor (flag cleared, no row).
    pub rows_skipped: u64,
}

/// Write a revision file for every listed entry whose `kind` flag is raised
/// and clear those flags.
///
/// The file name takes the next batch number before the pass transaction
/// opens, so a failed export burns a number but never reuses one. Flags are
/// only cleared if the whole file was written and flushed.
pub async fn export_revisions(
    pool: &SqlitePool,
    kind: RevisionKind,
    out_dir: &Path,
    action_marker: &str,
) -> Result<ExportSummary> {
    let name = next_name(pool, kind.prefix()).await?;
    let path = out_dir.join(&name);
    info!(%kind, path = %path.display(), "revision export start");

    let mut tx = pool.begin().await.context("begin export tx failed")?;

    let pending = fetch_pending(&mut *tx, kind.field()).await?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir failed: {}", out_dir.display()))?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .from_path(&path)
        .with_context(|| format!("create revision file failed: {}", path.display()))?;

    wtr.write_record([action_marker, ITEM_ID_HEADER, kind.value_header()])
        .context("write revision header failed")?;

    let mut summary = ExportSummary {
        kind,
        path: path.clone(),
        rows_written: 0,
        rows_skipped: 0,
    };

    for entry in &pending {
        match kind.value(entry) {
            Some(value) => {
                wtr.write_record([ROW_ACTION, entry.listing_id.as_str(), value.as_str()])
                    .with_context(|| format!("write revision row failed for code={}", entry.code))?;
                summary.rows_written += 1;
            }
            None => {
                debug!(code = %entry.code, price = entry.price, "below price floor; not pushed");
                summary.rows_skipped += 1;
            }
        }
        clear_dirty(&mut *tx, &entry.code, kind.field()).await?;
    }

    wtr.flush()
        .with_context(|| format!("flush revision file failed: {}", path.display()))?;
    drop(wtr);

    tx.commit().await.context("commit export tx failed")?;

    info!(
        %kind,
        path = %path.display(),
        written = summary.rows_written,
        skipped = summary.rows_skipped,
        "revision export done"
    );

    Ok(summary)
}
