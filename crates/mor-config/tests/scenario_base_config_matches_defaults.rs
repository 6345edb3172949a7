use std::path::Path;

use mor_config::{load_layered_yaml, MorConfig};

#[test]
fn shipped_base_layer_spells_out_the_defaults() -> anyhow::Result<()> {
    let base = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config/defaults/base.yaml");
    let base_s = base.to_string_lossy().to_string();

    let loaded = load_layered_yaml(&[base_s.as_str()])?;
    assert_eq!(loaded.config, MorConfig::default());
    assert_eq!(loaded.config_hash.len(), 64);
    Ok(())
}
