//! Configuration Integration Tests
//!
//! Config file loading, CLI-style overrides, validation into engine settings,
//! and credential precedence.

use std::collections::HashMap;

use usecase_mapper::models::settings::{AppConfig, SettingsUpdate};
use usecase_mapper::AppError;
use usecase_mapper_llm::ProviderType;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_file_then_overrides_then_settings() {
    let (_dir, path) = write_config(
        r#"
        api_key = "file-key"

        [engine]
        model = "gemini-2.5-flash"
        batch_size = 20
        rpm = 10.0

        [provider]
        kind = "gemini"
        timeout_secs = 30
        "#,
    );

    let mut config = AppConfig::load(Some(&path)).unwrap();
    config.apply_update(SettingsUpdate {
        batch_size: Some(50),
        ..Default::default()
    });

    let settings = config.engine_settings().unwrap();
    assert_eq!(settings.model(), "gemini-2.5-flash");
    assert_eq!(settings.batch_size(), 50);
    assert_eq!(settings.rpm(), 10.0);

    let provider = config.provider_config();
    assert_eq!(provider.provider, ProviderType::Gemini);
    assert_eq!(provider.timeout_secs, 30);
}

#[test]
fn test_invalid_engine_values_fail_validation() {
    let (_dir, path) = write_config("[engine]\nrpm = -5.0\n");
    let config = AppConfig::load(Some(&path)).unwrap();
    assert!(matches!(config.engine_settings().unwrap_err(), AppError::Core(_)));
}

#[test]
fn test_unreadable_toml_is_config_error() {
    let (_dir, path) = write_config("[engine\nmodel = ");
    assert!(matches!(AppConfig::load(Some(&path)).unwrap_err(), AppError::Config(_)));
}

#[test]
fn test_cli_key_beats_file_key_beats_environment() {
    let (_dir, path) = write_config("api_key = \"file-key\"\n");
    let env: HashMap<&str, &str> = [("API_KEY", "env-key")].into_iter().collect();
    let lookup = |name: &str| env.get(name).map(|v| v.to_string());

    let mut config = AppConfig::load(Some(&path)).unwrap();
    assert_eq!(config.resolve_credential_with(lookup).unwrap().expose(), "file-key");

    config.apply_update(SettingsUpdate {
        api_key: Some("cli-key".to_string()),
        ..Default::default()
    });
    assert_eq!(config.resolve_credential_with(lookup).unwrap().expose(), "cli-key");

    config.api_key = None;
    assert_eq!(config.resolve_credential_with(lookup).unwrap().expose(), "env-key");
}
