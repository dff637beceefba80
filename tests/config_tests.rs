use budget_model::config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert!(cfg.ui_color_enabled);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    assert!(!manager.config_path().exists());
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.currency = "EUR".to_string();
    cfg.ui_color_enabled = false;
    cfg.default_budget_root = Some(dir.path().join("budgets"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn corrupt_config_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(manager.config_path(), "{ not json").unwrap();

    let err = manager.load().unwrap_err();
    assert!(err.to_string().starts_with("Serialization error"));
}
