//! Command handler modules for mor-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Pass-specific printing lives in the submodules.

pub mod pass;

use anyhow::{Context, Result};
use mor_config::{LoadedConfig, MorConfig};
use sqlx::SqlitePool;
use tracing::info;

/// Everything a catalog pass needs: a migrated pool and the effective config.
pub struct PassContext {
    pub pool: SqlitePool,
    pub loaded: LoadedConfig,
}

impl PassContext {
    pub fn config(&self) -> &MorConfig {
        &self.loaded.config
    }
}

pub fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    mor_config::load_layered_yaml(&path_refs).context("load config failed")
}

/// `MOR_DATABASE_URL` overrides `db.url`.
pub async fn connect(cfg: &MorConfig) -> Result<SqlitePool> {
    let url = mor_db::resolve_db_url(&cfg.db.url);
    mor_db::connect(&url, cfg.db.max_connections).await
}

pub async fn open_for_pass(config_paths: &[String]) -> Result<PassContext> {
    let loaded = load_config(config_paths)?;
    info!(config_hash = %loaded.config_hash, "config loaded");

    let pool = connect(&loaded.config).await?;
    mor_db::migrate(&pool).await?;

    Ok(PassContext { pool, loaded })
}
