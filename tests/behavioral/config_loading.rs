// ABOUTME: Behavioral tests for configuration loading and layering
// Verifies defaults, file precedence, env overrides and TOML roundtrips

use super::fixtures::TestDataDir;
use ict_portal::config::{AppConfig, SessionBackend};

/// Default config points at a local API with the standard endpoints
#[test]
fn test_default_config_has_sensible_values() {
    let config = AppConfig::default();

    assert_eq!(config.api.base_url, "http://localhost:5000");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.api.endpoints.registration_submit, "/api/registration");
    assert_eq!(config.api.endpoints.auth_login, "/api/auth/login");
    assert_eq!(config.api.endpoints.materials_upload, "/api/materials/upload");
    assert_eq!(config.api.endpoints.attendance_check_in, "/api/attendance/check-in");

    assert_eq!(config.materials.max_upload_bytes, 20 * 1024 * 1024);
    assert!(config.materials.allowed_extensions.contains(&"pdf".to_string()));
    assert!(!config.materials.allowed_extensions.contains(&"exe".to_string()));

    assert_eq!(config.session.backend, SessionBackend::File);
    assert!(config.ui_preferences.show_password_hints);

    assert_eq!(
        config.version,
        env!("CARGO_PKG_VERSION"),
        "Version should match package version"
    );
}

/// Missing files are skipped and leave the defaults in place
#[test]
fn test_missing_files_fall_back_to_defaults() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    let config = AppConfig::load_from_paths(&[data.path().join("nope.toml")])?;
    assert_eq!(config.api.base_url, "http://localhost:5000");
    Ok(())
}

/// The first path wins over later ones, key by key
#[test]
fn test_earlier_paths_take_precedence() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    let project = data.write_config(
        "project/.ict-portal/config.toml",
        r#"
[api]
base_url = "https://portal.school.example"
"#,
    )?;
    let user = data.write_config(
        "home/.ict-portal/config/config.toml",
        r#"
[api]
base_url = "https://ignored.example"
timeout_secs = 10

[session]
backend = "keyring"

[materials]
allowed_extensions = [".PDF", "Docx"]
"#,
    )?;

    let config = AppConfig::load_from_paths(&[project, user])?;

    assert_eq!(config.api.base_url, "https://portal.school.example");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.session.backend, SessionBackend::Keyring);
    assert_eq!(config.materials.allowed_extensions, vec!["pdf", "docx"]);
    Ok(())
}

/// Malformed TOML is reported with the offending path
#[test]
fn test_invalid_config_is_an_error() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    let broken = data.write_config("config.toml", "[api\nbase_url = ")?;

    let err = AppConfig::load_from_paths(&[broken.clone()]).unwrap_err();
    assert!(format!("{err:#}").contains(&broken.display().to_string()));
    Ok(())
}

/// The env override replaces the base URL; blank values are ignored
#[test]
fn test_env_override_for_api_url() {
    let mut config = AppConfig::default();
    config.apply_env_overrides(Some("   ".to_string()));
    assert_eq!(config.api.base_url, "http://localhost:5000");

    config.apply_env_overrides(Some(" https://staging.portal.example ".to_string()));
    assert_eq!(config.api.base_url, "https://staging.portal.example");

    config.apply_env_overrides(None);
    assert_eq!(config.api.base_url, "https://staging.portal.example");
}

/// Saved config loads back unchanged
#[test]
fn test_config_save_and_reload() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    let path = data.path().join("saved/config.toml");

    let mut config = AppConfig::default();
    config.api.base_url = "https://portal.school.example".to_string();
    config.materials.max_upload_bytes = 5 * 1024 * 1024;
    config.ui_preferences.show_password_hints = false;
    config.save_to(&path)?;

    let toml_str = std::fs::read_to_string(&path)?;
    assert!(toml_str.contains("base_url = \"https://portal.school.example\""));
    assert!(toml_str.contains("backend = \"file\""));

    let loaded = AppConfig::load_from_paths(&[path])?;
    assert_eq!(loaded.api.base_url, config.api.base_url);
    assert_eq!(loaded.materials.max_upload_bytes, 5 * 1024 * 1024);
    assert!(!loaded.ui_preferences.show_password_hints);
    Ok(())
}
