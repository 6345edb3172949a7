use anyhow::Result;

async fn fresh_pool(dir: &tempfile::TempDir) -> Result<sqlx::SqlitePool> {
    let pool = mor_db::connect_path(&dir.path().join("catalog.sqlite")).await?;
    mor_db::migrate(&pool).await?;
    Ok(pool)
}

#[tokio::test]
async fn names_are_strictly_increasing_without_gaps() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let pool = fresh_pool(&dir).await?;

    assert_eq!(mor_db::current_batch_number(&pool).await?, None);

    let mut names = Vec::new();
    for _ in 0..5 {
        names.push(mor_db::next_name(&pool, "revise_qty").await?);
    }

    assert_eq!(
        names,
        vec![
            "revise_qty_0000.csv",
            "revise_qty_0001.csv",
            "revise_qty_0002.csv",
            "revise_qty_0003.csv",
            "revise_qty_0004.csv",
        ]
    );
    assert_eq!(mor_db::current_batch_number(&pool).await?, Some(4));
    Ok(())
}

#[tokio::test]
async fn counter_is_shared_across_prefixes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let pool = fresh_pool(&dir).await?;

    let a = mor_db::next_name(&pool, "revise_qty").await?;
    let b = mor_db::next_name(&pool, "revise_prc").await?;

    assert_eq!(a, "revise_qty_0000.csv");
    assert_eq!(b, "revise_prc_0001.csv");
    Ok(())
}

/// An issued number is durable: a process that dies right after the
/// increment commits (simulated by dropping the pool without using the name)
/// must not see that number again.
#[tokio::test]
async fn committed_number_survives_crash_and_is_not_reissued() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("catalog.sqlite");

    {
        let pool = mor_db::connect_path(&db_path).await?;
        mor_db::migrate(&pool).await?;
        assert_eq!(mor_db::next_batch_number(&pool).await?, 0);
        assert_eq!(mor_db::next_batch_number(&pool).await?, 1);
        // "crash": the name for 1 is never consumed
        pool.close().await;
    }

    let pool = mor_db::connect_path(&db_path).await?;
    mor_db::migrate(&pool).await?;
    assert_eq!(mor_db::next_batch_number(&pool).await?, 2);
    Ok(())
}
