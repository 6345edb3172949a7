//! Drives the `mor` binary from a scratch working directory using the default
//! layout (`data/estrazione`, `data/attivo_report`, `db/db.sqlite`).

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

fn mor(cwd: &Path) -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin("mor")?;
    cmd.current_dir(cwd)
        .env_remove(mor_db::ENV_DB_URL)
        .env("RUST_LOG", "warn");
    Ok(cmd)
}

fn report_line(id: &str, code: &str, qty: &str, price: &str, oosc: &str) -> String {
    let mut cols = vec![String::new(); 23];
    cols[0] = id.to_string();
    cols[1] = code.to_string();
    cols[5] = qty.to_string();
    cols[8] = price.to_string();
    cols[22] = oosc.to_string();
    cols.join(";")
}

#[test]
fn link_check_on_empty_inbox_fails() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    fs::create_dir_all(tmp.path().join("data/attivo_report"))?;

    mor(tmp.path())?
        .arg("link-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input file found"));
    Ok(())
}

#[test]
fn db_migrate_then_status() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;

    mor(tmp.path())?
        .args(["db", "migrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("migrated=true"));

    mor(tmp.path())?
        .args(["db", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("db_ok=true has_articles_table=true"));

    assert!(tmp.path().join("db/db.sqlite").exists());
    Ok(())
}

#[test]
fn cycle_writes_revision_files() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let stock = tmp.path().join("data/estrazione");
    let report = tmp.path().join("data/attivo_report");
    fs::create_dir_all(&stock)?;
    fs::create_dir_all(&report)?;

    fs::write(
        stock.join("extract.txt"),
        "ABC0000001;desc;10;20;30;;;;;5\nABC0000002;desc;25000;0;0;;;;;2\n",
    )?;
    fs::write(
        report.join("report.csv"),
        format!(
            "header\n{}\n{}\n{}\n",
            report_line("X1", "ABC0000001", "7", "0,03", "true"),
            report_line("X2", "ABC0000002", "2", "20,00 EUR", "false"),
            report_line("X9", "ZZZ0000009", "1", "5,00", "true"),
        ),
    )?;

    mor(tmp.path())?
        .arg("cycle")
        .assert()
        .success()
        .stdout(predicate::str::contains("stock_loaded=2 created=2"))
        .stdout(predicate::str::contains("matched=2 quantity_flagged=1 price_flagged=1"))
        .stdout(predicate::str::contains("\"kind\":\"unknown_listing\""))
        .stdout(predicate::str::contains("\"kind\":\"out_of_stock_control_disabled\""))
        .stdout(predicate::str::contains("export=quantity"))
        .stdout(predicate::str::contains("catalog_entries=2 listed=2"));

    let qty = fs::read_to_string(tmp.path().join("data/revise_qty_0000.csv"))?;
    assert!(qty.ends_with("Revise;X1;5\n"));

    let prc = fs::read_to_string(tmp.path().join("data/revise_prc_0001.csv"))?;
    assert!(prc.ends_with("Revise;X2;25.0\n"));

    // both inboxes were consumed
    assert!(!stock.join("extract.txt").exists());
    assert!(!report.join("report.csv").exists());
    Ok(())
}
