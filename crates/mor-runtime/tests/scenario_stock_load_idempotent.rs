//! Scenario: the stock loader converges to the same state when re-run, and
//! items missing from the extract drop to zero quantity.

use std::fs;
use std::path::Path;

use mor_db::{fetch_entry, list_entries};
use mor_runtime::load_stock;
use sqlx::SqlitePool;

const EXTRACT: &str = "\
A0001;x;1000;2000;1500;;;;;3
B0002;x;15990;0;0;;;;;1
C0003;x;500;500;500;;;;;0
";

async fn fresh_db(dir: &Path) -> anyhow::Result<SqlitePool> {
    let pool = mor_db::connect_path(&dir.join("db.sqlite")).await?;
    mor_db::migrate(&pool).await?;
    Ok(pool)
}

async fn snapshot(pool: &SqlitePool) -> anyhow::Result<Vec<(String, i64, f64)>> {
    let mut conn = pool.acquire().await?;
    Ok(list_entries(&mut conn)
        .await?
        .into_iter()
        .map(|e| (e.code, e.quantity, e.price))
        .collect())
}

#[tokio::test]
async fn same_extract_twice_gives_same_state() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let inbox = tmp.path().join("estrazione");
    fs::create_dir_all(&inbox)?;
    let pool = fresh_db(tmp.path()).await?;

    fs::write(inbox.join("extract.txt"), EXTRACT)?;
    let first = load_stock(&pool, &inbox).await?;
    let after_first = snapshot(&pool).await?;

    fs::write(inbox.join("extract.txt"), EXTRACT)?;
    let second = load_stock(&pool, &inbox).await?;
    let after_second = snapshot(&pool).await?;

    assert_eq!(after_first, after_second);
    assert_eq!(
        after_first,
        vec![
            ("A0001".to_string(), 3, 2.0),
            ("B0002".to_string(), 1, 15.99),
            ("C0003".to_string(), 0, 0.5),
        ]
    );

    assert_eq!((first.created, first.updated), (3, 0));
    assert_eq!((second.created, second.updated), (0, 3));
    assert_eq!(second.zeroed, 3);
    Ok(())
}

#[tokio::test]
async fn missing_items_are_zeroed_and_links_kept() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let inbox = tmp.path().join("estrazione");
    fs::create_dir_all(&inbox)?;
    let pool = fresh_db(tmp.path()).await?;

    fs::write(inbox.join("extract.txt"), EXTRACT)?;
    load_stock(&pool, &inbox).await?;

    {
        let mut conn = pool.acquire().await?;
        mor_db::apply_listing(&mut conn, "B0002", "X2", true, false).await?;
    }

    // B0002 sold out: the next extract omits it.
    fs::write(inbox.join("extract.txt"), "A0001;x;1000;2000;1500;;;;;4\n")?;
    let s = load_stock(&pool, &inbox).await?;
    assert_eq!(s.loaded, 1);

    let mut conn = pool.acquire().await?;
    let b = fetch_entry(&mut conn, "B0002").await?.expect("entry kept");
    assert_eq!(b.quantity, 0);
    assert_eq!(b.price, 15.99);
    assert_eq!(b.listing_id, "X2");
    assert!(b.quantity_dirty);

    let a = fetch_entry(&mut conn, "A0001").await?.expect("entry kept");
    assert_eq!(a.quantity, 4);
    Ok(())
}

#[tokio::test]
async fn bad_rows_are_skipped_and_the_pass_commits() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let inbox = tmp.path().join("estrazione");
    fs::create_dir_all(&inbox)?;
    let pool = fresh_db(tmp.path()).await?;

    let body = "\
A0001;x;1000;0;0;;;;;2
short;row
B0002;x;abc;0;0;;;;;1
N0003;x;1000;0;0;;;;;-4
C0004;x;2000;0;0;;;;;6
";
    fs::write(inbox.join("extract.txt"), body)?;
    let s = load_stock(&pool, &inbox).await?;

    assert_eq!(s.loaded, 2);
    assert_eq!(s.rows_rejected, 2);
    // negative quantity parses but the catalog refuses it
    assert_eq!(s.rows_failed, 1);
    assert!(!inbox.join("extract.txt").exists());

    let codes: Vec<String> = snapshot(&pool).await?.into_iter().map(|r| r.0).collect();
    assert_eq!(codes, vec!["A0001", "C0004"]);
    Ok(())
}
