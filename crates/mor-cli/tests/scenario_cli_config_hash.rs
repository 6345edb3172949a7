use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn config_hash_is_stable_across_runs() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let base = tmp.path().join("base.yaml");
    std::fs::write(&base, "paths:\n  data_dir: out\ndb:\n  max_connections: 2\n")?;

    let run = || -> anyhow::Result<String> {
        let out = Command::cargo_bin("mor")?
            .current_dir(tmp.path())
            .args(["config-hash", base.to_str().unwrap_or_default()])
            .output()?;
        assert!(out.status.success());
        Ok(String::from_utf8(out.stdout)?)
    };

    let a = run()?;
    let b = run()?;
    assert_eq!(a, b);
    assert!(a.starts_with("config_hash="));
    assert!(a.contains("\"max_connections\":2"));
    Ok(())
}

#[test]
fn config_with_secret_literal_is_refused() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let bad = tmp.path().join("bad.yaml");
    std::fs::write(&bad, "db:\n  url: \"sk-live-abc\"\n")?;

    Command::cargo_bin("mor")?
        .current_dir(tmp.path())
        .args(["config-hash", bad.to_str().unwrap_or_default()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_SECRET_DETECTED"));
    Ok(())
}
