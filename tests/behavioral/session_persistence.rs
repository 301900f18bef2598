// ABOUTME: Behavioral tests for session persistence shared by the CLI and TUI
//
// Verifies the on-disk JSON format, round-trips, malformed-data cleanup and sign-out.

use super::fixtures::{sample_session, sample_user, TestDataDir, SAMPLE_TOKEN};
use ict_portal::app::{App, Route, View};
use ict_portal::api::PortalApiClient;
use ict_portal::config::AppConfig;
use ict_portal::session::{self, MemorySessionStore, SessionStore};
use serde_json::json;

/// Test 1: Save and read preserves the token and user record
#[test]
fn test_file_store_roundtrip() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    let store = data.session_store();
    store.init()?;

    let saved = sample_session();
    store.save(&saved)?;

    let loaded = store.read()?.expect("session should be stored");
    assert_eq!(loaded.token, SAMPLE_TOKEN);
    assert_eq!(loaded.user, sample_user());
    assert_eq!(loaded.saved_at, saved.saved_at);
    Ok(())
}

/// Test 2: The file holds `{token, user}` with camelCase user keys
#[test]
fn test_file_format() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    let store = data.session_store();
    store.init()?;
    store.save(&sample_session())?;

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(data.session_path())?)?;
    assert_eq!(raw["token"], SAMPLE_TOKEN);
    assert_eq!(raw["user"]["firstName"], "Nimal");
    assert_eq!(raw["user"]["dashboardUrl"], "/student/dashboard");
    Ok(())
}

/// Test 3: A token that is not JWT-shaped is cleared and ignored
#[test]
fn test_malformed_token_is_cleared() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    std::fs::write(
        data.session_path(),
        json!({"token": "not-a-jwt", "user": {"email": "x@example.com"}}).to_string(),
    )?;

    let store = data.session_store();
    assert!(store.read()?.is_none());
    assert!(!data.session_path().exists(), "malformed session should be removed");
    Ok(())
}

/// Test 4: Unparseable files are treated the same way
#[test]
fn test_garbage_file_is_cleared() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    std::fs::write(data.session_path(), "{{{ not json")?;

    assert!(session::restore(&data.session_store()).is_none());
    assert!(!data.session_path().exists());
    Ok(())
}

/// Test 5: The in-memory store applies the same checks
#[test]
fn test_memory_store_drops_bad_user_record() -> anyhow::Result<()> {
    let store = MemorySessionStore::with_raw(SAMPLE_TOKEN, json!("just a string"));
    assert!(store.read()?.is_none());
    assert!(store.is_empty());
    Ok(())
}

/// Test 6: Clearing an empty store is not an error
#[test]
fn test_clear_is_idempotent() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    let store = data.session_store();
    store.clear()?;
    store.save(&sample_session())?;
    store.clear()?;
    store.clear()?;
    assert!(store.read()?.is_none());
    Ok(())
}

/// Test 7: Startup restores a saved session into the dashboard and sign-out forgets it
#[test]
fn test_app_restores_and_signs_out() -> anyhow::Result<()> {
    let data = TestDataDir::new()?;
    data.session_store().save(&sample_session())?;

    let config = AppConfig::default();
    let client = PortalApiClient::new(&config.api)?;
    let mut app = App::with_parts(config, client, Box::new(data.session_store()));
    app.init();

    assert_eq!(app.state.current_view, View::Dashboard);
    assert_eq!(
        app.state.current_route,
        Route::Dashboard("/student/dashboard".to_string())
    );

    app.sign_out();
    assert!(!app.state.is_signed_in());
    assert_eq!(app.state.current_route, Route::Home);
    assert!(data.session_store().read()?.is_none());
    Ok(())
}
