use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

/// One catalog row. `code` is the identity key; an empty `listing_id` means
/// the item is not currently listed on the marketplace.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub code: String,
    pub listing_id: String,
    pub quantity: i64,
    pub price: f64,
    pub quantity_dirty: bool,
    pub price_dirty: bool,
}

impl CatalogEntry {
    pub fn is_listed(&self) -> bool {
        !self.listing_id.is_empty()
    }
}

/// Which pending-push flag an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyField {
    Quantity,
    Price,
}

impl DirtyField {
    fn column(self) -> &'static str {
        match self {
            DirtyField::Quantity => "quantity_dirty",
            DirtyField::Price => "price_dirty",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirtyField::Quantity => "quantity",
            DirtyField::Price => "price",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

const ENTRY_COLUMNS: &str =
    "code, listing_id, quantity, price, quantity_dirty, price_dirty";

fn entry_from_row(r: &SqliteRow) -> Result<CatalogEntry> {
    Ok(CatalogEntry {
        code: r.try_get("code").context("articles.code")?,
        listing_id: r.try_get("listing_id").context("articles.listing_id")?,
        quantity: r.try_get("quantity").context("articles.quantity")?,
        price: r.try_get("price").context("articles.price")?,
        quantity_dirty: r
            .try_get("quantity_dirty")
            .context("articles.quantity_dirty")?,
        price_dirty: r.try_get("price_dirty").context("articles.price_dirty")?,
    })
}

pub async fn fetch_entry(conn: &mut SqliteConnection, code: &str) -> Result<Option<CatalogEntry>> {
    let row = sqlx::query(&format!(
        "select {ENTRY_COLUMNS} from articles where code = ?1"
    ))
    .bind(code)
    .fetch_optional(&mut *conn)
    .await
    .context("fetch_entry failed")?;

    row.as_ref().map(entry_from_row).transpose()
}

/// All entries ordered by code.
pub async fn list_entries(conn: &mut SqliteConnection) -> Result<Vec<CatalogEntry>> {
    let rows = sqlx::query(&format!(
        "select {ENTRY_COLUMNS} from articles order by code asc"
    ))
    .fetch_all(&mut *conn)
    .await
    .context("list_entries failed")?;

    rows.iter().map(entry_from_row).collect()
}

// ---------------------------------------------------------------------------
// Stock load
// ---------------------------------------------------------------------------

/// Set quantity to 0 on every entry. The stock extract omits zero-quantity
/// rows, so the load pass clears before applying.
pub async fn zero_all_quantities(conn: &mut SqliteConnection) -> Result<u64> {
    let res = sqlx::query("update articles set quantity = 0")
        .execute(&mut *conn)
        .await
        .context("zero_all_quantities failed")?;
    Ok(res.rows_affected())
}

/// Create the entry if `code` is unseen, then overwrite quantity and price.
/// Listing id and dirty flags are left untouched.
pub async fn upsert_stock(
    conn: &mut SqliteConnection,
    code: &str,
    quantity: i64,
    price: f64,
) -> Result<UpsertOutcome> {
    let existing: Option<i64> = sqlx::query_scalar("select id from articles where code = ?1")
        .bind(code)
        .fetch_optional(&mut *conn)
        .await
        .context("upsert_stock lookup failed")?;

    match existing {
        Some(id) => {
            sqlx::query("update articles set quantity = ?1, price = ?2 where id = ?3")
                .bind(quantity)
                .bind(price)
                .bind(id)
                .execute(&mut *conn)
                .await
                .with_context(|| format!("upsert_stock update failed for code={code}"))?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            sqlx::query("insert into articles (code, quantity, price) values (?1, ?2, ?3)")
                .bind(code)
                .bind(quantity)
                .bind(price)
                .execute(&mut *conn)
                .await
                .with_context(|| format!("upsert_stock insert failed for code={code}"))?;
            Ok(UpsertOutcome::Created)
        }
    }
}

// ---------------------------------------------------------------------------
// Listing reconciliation
// ---------------------------------------------------------------------------

/// Forget every listing link and pending flag before a new snapshot is applied.
pub async fn reset_listing_state(conn: &mut SqliteConnection) -> Result<u64> {
    let res = sqlx::query(
        "update articles set listing_id = '', quantity_dirty = 0, price_dirty = 0",
    )
    .execute(&mut *conn)
    .await
    .context("reset_listing_state failed")?;
    Ok(res.rows_affected())
}

/// Link `code` to `listing_id` and raise the requested flags. Flags are only
/// ever raised here; a later row for the same code cannot lower them within a
/// pass.
pub async fn apply_listing(
    conn: &mut SqliteConnection,
    code: &str,
    listing_id: &str,
    quantity_dirty: bool,
    price_dirty: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        update articles
        set listing_id = ?1,
            quantity_dirty = quantity_dirty or ?2,
            price_dirty = price_dirty or ?3
        where code = ?4
        "#,
    )
    .bind(listing_id)
    .bind(quantity_dirty)
    .bind(price_dirty)
    .bind(code)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("apply_listing failed for code={code}"))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Export draining
// ---------------------------------------------------------------------------

/// Listed entries whose `field` flag is raised, ordered by code.
pub async fn fetch_pending(
    conn: &mut SqliteConnection,
    field: DirtyField,
) -> Result<Vec<CatalogEntry>> {
    let rows = sqlx::query(&format!(
        "select {ENTRY_COLUMNS} from articles where listing_id <> '' and {} order by code asc",
        field.column()
    ))
    .fetch_all(&mut *conn)
    .await
    .with_context(|| format!("fetch_pending({}) failed", field.as_str()))?;

    rows.iter().map(entry_from_row).collect()
}

pub async fn clear_dirty(conn: &mut SqliteConnection, code: &str, field: DirtyField) -> Result<()> {
    sqlx::query(&format!(
        "update articles set {} = 0 where code = ?1",
        field.column()
    ))
    .bind(code)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("clear_dirty({}) failed for code={code}", field.as_str()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Post-load overview of marketplace coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogSummary {
    pub entries: i64,
    pub listed: i64,
    pub listed_pieces: i64,
    pub listed_out_of_stock: i64,
    /// In stock locally but not listed: candidates for new listings.
    pub unlisted_in_stock: i64,
    pub unlisted_pieces: i64,
}

pub async fn catalog_summary(conn: &mut SqliteConnection) -> Result<CatalogSummary> {
    let row = sqlx::query(
        r#"
        select
          count(*) as entries,
          coalesce(sum(case when listing_id <> '' then 1 else 0 end), 0) as listed,
          coalesce(sum(case when listing_id <> '' then quantity else 0 end), 0) as listed_pieces,
          coalesce(sum(case when listing_id <> '' and quantity = 0 then 1 else 0 end), 0)
            as listed_out_of_stock,
          coalesce(sum(case when listing_id = '' and quantity > 0 then 1 else 0 end), 0)
            as unlisted_in_stock,
          coalesce(sum(case when listing_id = '' and quantity > 0 then quantity else 0 end), 0)
            as unlisted_pieces
        from articles
        "#,
    )
    .fetch_one(&mut *conn)
    .await
    .context("catalog_summary failed")?;

    Ok(CatalogSummary {
        entries: row.try_get("entries")?,
        listed: row.try_get("listed")?,
        listed_pieces: row.try_get("listed_pieces")?,
        listed_out_of_stock: row.try_get("listed_out_of_stock")?,
        unlisted_in_stock: row.try_get("unlisted_in_stock")?,
        unlisted_pieces: row.try_get("unlisted_pieces")?,
    })
}
