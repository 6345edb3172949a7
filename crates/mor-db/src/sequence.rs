use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::debug;

/// Issue the next batch number.
///
/// The first call on an empty store creates the counter at 0 and returns 0;
/// every later call returns the previous value + 1. The new value is committed
/// before it is returned, so a crash after this point can skip a number but
/// never reuse one.
pub async fn next_batch_number(pool: &SqlitePool) -> Result<i64> {
    let mut tx = pool.begin().await.context("sequence begin failed")?;

    let current: Option<i64> = sqlx::query_scalar("select number from sequences where id = 1")
        .fetch_optional(&mut *tx)
        .await
        .context("sequence read failed")?;

    let next = match current {
        Some(n) => n + 1,
        None => 0,
    };

    sqlx::query(
        r#"
        insert into sequences (id, number) values (1, ?1)
        on conflict (id) do update set number = excluded.number
        "#,
    )
    .bind(next)
    .execute(&mut *tx)
    .await
    .context("sequence write failed")?;

    tx.commit().await.context("sequence commit failed")?;

    debug!(number = next, "issued batch number");
    Ok(next)
}

/// Last issued batch number, if any.
pub async fn current_batch_number(pool: &SqlitePool) -> Result<Option<i64>> {
    sqlx::query_scalar("select number from sequences where id = 1")
        .fetch_optional(pool)
        .await
        .context("sequence read failed")
}

/// `<prefix>_<number zero-padded to 4>.csv`. Padding is a minimum width.
pub fn batch_file_name(prefix: &str, number: i64) -> String {
    format!("{prefix}_{number:04}.csv")
}

/// Reserve a batch number and return the file name built from it.
pub async fn next_name(pool: &SqlitePool, prefix: &str) -> Result<String> {
    let n = next_batch_number(pool).await?;
    Ok(batch_file_name(prefix, n))
}
