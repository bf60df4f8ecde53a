//! Sets HEART_PROJECT_ROOT, so it runs in its own process.

use heart_predictor::config::ROOT_ENV_VAR;
use heart_predictor::{AppConfig, Settings};

#[test]
fn env_root_applies_unless_settings_name_one() {
    let env_root = tempfile::tempdir().unwrap();
    let settings_root = tempfile::tempdir().unwrap();
    std::env::set_var(ROOT_ENV_VAR, env_root.path());

    let cfg = AppConfig::from_settings(&Settings::default()).unwrap();
    assert_eq!(cfg.project_root, env_root.path());
    assert!(cfg.model_path.starts_with(env_root.path()));
    assert!(env_root.path().join("artifacts").is_dir());

    let settings = Settings {
        project_root: Some(settings_root.path().to_path_buf()),
        ..Settings::default()
    };
    let cfg = AppConfig::from_settings(&settings).unwrap();
    assert_eq!(cfg.project_root, settings_root.path());
    assert!(cfg.logs_path.starts_with(settings_root.path()));

    std::env::remove_var(ROOT_ENV_VAR);
}
