use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// Default marketplace "smart header" for the first column of revision files.
/// Encodes site, country, currency, schema version and file encoding.
pub const DEFAULT_ACTION_MARKER: &str =
    "*Action(SiteID=Italy|Country=IT|Currency=EUR|Version=745|CC=UTF-8)";

/// Known secret-like prefixes. The merged config is hashed and printed, so any
/// leaf string starting with one of these aborts loading.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",
    "sk_live",
    "sk_test",
    "AKIA",
    "-----BEGIN",
    "ghp_",
    "glpat-",
    "xoxb-",
];

// ---------------------------------------------------------------------------
// Typed config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorConfig {
    pub paths: PathsConfig,
    pub db: DbConfig,
    pub export: ExportConfig,
}

/// Inbox/outbox locations. Each inbox must hold exactly one file when its
/// pass runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Output directory for revision files.
    pub data_dir: PathBuf,
    /// Stock/price extract inbox.
    pub stock_dir: PathBuf,
    /// Marketplace listing report inbox.
    pub report_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub action_marker: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            stock_dir: data_dir.join("estrazione"),
            report_dir: data_dir.join("attivo_report"),
            data_dir,
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://db/db.sqlite".to_string(),
            max_connections: 1,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            action_marker: DEFAULT_ACTION_MARKER.to_string(),
        }
    }
}

impl MorConfig {
    /// Deserialize from the merged JSON document. Missing keys take defaults.
    pub fn from_json(v: &Value) -> Result<Self> {
        let cfg: MorConfig =
            serde_json::from_value(v.clone()).context("config does not match MorConfig shape")?;
        if cfg.db.max_connections == 0 {
            bail!("db.max_connections must be > 0");
        }
        if cfg.export.action_marker.trim().is_empty() {
            bail!("export.action_marker must not be empty");
        }
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Layered YAML loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub config: MorConfig,
}

/// Load and merge YAML files in order: earlier files are base, later override.
/// An empty path list yields the defaults.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        // An empty document parses as null; treat it as "no overrides".
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let config = MorConfig::from_json(&merged)?;
    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());

    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
        config,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_strings(v, "", &mut leaves);
    for (ptr, s) in leaves {
        if looks_like_secret(s) {
            bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
        }
    }
    Ok(())
}

fn collect_leaf_strings<'a>(v: &'a Value, prefix: &str, out: &mut Vec<(String, &'a str)>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                collect_leaf_strings(vv, &format!("{prefix}/{k}"), out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_strings(vv, &format!("{prefix}/{i}"), out);
            }
        }
        Value::String(s) => out.push((prefix.to_string(), s.as_str())),
        _ => {}
    }
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 8 && SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}
