//! Durable catalog state: the `articles` table (one row per product code) and
//! the single-row batch `sequences` counter.
//!
//! Pass-scoped mutations take `&mut SqliteConnection` so callers can run them
//! inside one `sqlx::Transaction` and commit exactly once per pass. The
//! sequence counter is the exception: it owns its own transaction because a
//! number must be durable before it is handed out.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

mod catalog;
mod sequence;

pub use catalog::{
    apply_listing, catalog_summary, clear_dirty, fetch_entry, fetch_pending, list_entries,
    reset_listing_state, upsert_stock, zero_all_quantities, CatalogEntry, CatalogSummary,
    DirtyField, UpsertOutcome,
};
pub use sequence::{batch_file_name, current_batch_number, next_batch_number, next_name};

pub const ENV_DB_URL: &str = "MOR_DATABASE_URL";

/// `MOR_DATABASE_URL` wins over the configured url when set.
pub fn resolve_db_url(configured: &str) -> String {
    std::env::var(ENV_DB_URL).unwrap_or_else(|_| configured.to_string())
}

/// Connect to the catalog database, creating the file (and its parent
/// directory) if missing.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid database url: {url}"))?
        .create_if_missing(true);

    // get_filename consumes the options.
    let filename = opts.clone().get_filename();
    if let Some(parent) = filename.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create db directory failed: {}", parent.display()))?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(opts)
        .await
        .context("failed to open catalog database")?;

    Ok(pool)
}

/// Open (or create) a database file at `path`. Used by tests and tooling that
/// work with throwaway databases.
pub async fn connect_path(path: &Path) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .with_context(|| format!("failed to open catalog database: {}", path.display()))
}

/// Run embedded SQLx migrations. Idempotent.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_articles_table: bool,
}

/// Connectivity + schema presence.
pub async fn status(pool: &SqlitePool) -> Result<DbStatus> {
    let (one,): (i64,) = sqlx::query_as("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;

    let (tables,): (i64,) = sqlx::query_as(
        "select count(*) from sqlite_master where type = 'table' and name = 'articles'",
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok: one == 1,
        has_articles_table: tables > 0,
    })
}
