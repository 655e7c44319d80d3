use pbill_kernel::config::{ConfigError, load_config, load_config_from};
use pbill_kernel::domain::config::{BillingConfig, RestartPolicy};
use std::collections::HashMap;
use std::fs;

#[test]
fn loads_file_and_keeps_defaults_for_missing_keys() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("billing.toml");
    fs::write(&path, "[purchase_updates]\ncapacity = 32\n\n[logging]\nlevel = \"debug\"\n")?;

    let cfg: BillingConfig = load_config_from(Some(&path), Some(HashMap::new()))?;

    assert_eq!(cfg.purchase_updates.capacity, 32);
    assert_eq!(cfg.purchase_updates.restart, RestartPolicy::Terminal);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.console);
    Ok(())
}

#[test]
fn environment_overrides_file_values() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("billing.toml");
    fs::write(&path, "[purchase_updates]\ncapacity = 32\n")?;

    let env = HashMap::from([
        ("PBILL__PURCHASE_UPDATES__CAPACITY".to_owned(), "8".to_owned()),
        ("PBILL__PURCHASE_UPDATES__RESTART".to_owned(), "restart".to_owned()),
    ]);
    let cfg: BillingConfig = load_config_from(Some(&path), Some(env))?;

    assert_eq!(cfg.purchase_updates.capacity, 8);
    assert_eq!(cfg.purchase_updates.restart, RestartPolicy::Restart);
    Ok(())
}

#[test]
fn missing_file_is_reported_with_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = load_config::<BillingConfig>(Some(&path)).expect_err("file is required");

    let ConfigError::Config { context, .. } = &err;
    assert_eq!(context.as_deref(), Some("Failed to build config"));
    assert!(err.to_string().starts_with("Config error (Failed to build config)"));
}
