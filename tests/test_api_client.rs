// ABOUTME: HTTP contract tests for the portal API client against a mock server
// Covers registration outcomes end to end through App, sign-in, uploads and check-in

use ict_portal::api::error::{FORBIDDEN_MESSAGE, LOCKED_MESSAGE, NETWORK_MESSAGE};
use ict_portal::api::{ApiError, LoginRequest, PortalApiClient};
use ict_portal::app::{App, AsyncAction, Route, ToastKind, View};
use ict_portal::components::registration::FormField;
use ict_portal::config::AppConfig;
use ict_portal::materials::{validate_material, UploadProgress};
use ict_portal::session::{FileSessionStore, MemorySessionStore, SessionStore};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::watch;

fn config_for(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = 5;
    config
}

fn app_for(base_url: &str, store: Box<dyn SessionStore>) -> App {
    let config = config_for(base_url);
    let client = PortalApiClient::new(&config.api).expect("client should build");
    App::with_parts(config, client, store)
}

/// Walk the TUI wizard to step 4 with valid data and queue the submission
fn queue_valid_registration(app: &mut App) {
    app.state.navigate(Route::Register);
    let wizard = &mut app.state.registration_state;
    wizard.set_field(FormField::FirstName, "Ada");
    wizard.set_field(FormField::LastName, "Lovelace");
    wizard.set_field(FormField::Email, "ada@example.com");
    wizard.set_field(FormField::Password, "secret1");
    wizard.set_field(FormField::ConfirmPassword, "secret1");
    assert!(wizard.next());
    wizard.set_field(FormField::ContactNumber, "0771234567");
    wizard.set_field(FormField::ParentContactNumber, "0777654321");
    wizard.set_address_city("Colombo");
    assert!(wizard.next());
    wizard.set_field(FormField::Year, "2026");
    wizard.set_field(FormField::Session, "May/June");
    wizard.set_field(FormField::Nationality, "Sri Lankan");
    wizard.set_field(FormField::School, "Royal College");
    assert!(wizard.next());

    app.state.request_registration_submit();
    assert!(matches!(
        app.state.pending_async_action,
        Some(AsyncAction::SubmitRegistration(_))
    ));
}

async fn mock_registration(server: &mut ServerGuard, status: usize, body: serde_json::Value) -> mockito::Mock {
    server
        .mock("POST", "/api/registration")
        .match_header("content-type", "application/json")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn test_registration_created_shows_toast_and_goes_home() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/registration")
        .match_body(Matcher::PartialJson(json!({
            "firstName": "Ada",
            "email": "ada@example.com",
            "city": "Colombo",
            "parentNumber": "0777654321",
            "isRetaker": false,
            "techKnowledge": 1,
        })))
        .with_status(201)
        .with_body(json!({"message": "Registered"}).to_string())
        .create_async()
        .await;

    let mut app = app_for(&server.url(), Box::new(MemorySessionStore::new()));
    queue_valid_registration(&mut app);
    app.process_async_action().await.unwrap();

    mock.assert_async().await;
    assert_eq!(app.state.current_route, Route::Home);
    assert_eq!(app.state.current_route.path(), "/");
    assert_eq!(app.state.current_view, View::Home);
    assert_eq!(
        app.state.toasts.last().map(|t| t.kind),
        Some(ToastKind::RegistrationSuccess)
    );
    assert_eq!(app.state.registration_state.position(), 1);
    assert!(app.state.registration_state.form.email.is_empty());
}

#[tokio::test]
async fn test_registration_validation_errors_surface_in_general() {
    let mut server = Server::new_async().await;
    let _mock = mock_registration(&mut server, 400, json!({"errors": [{"msg": "Email invalid"}]})).await;

    let mut app = app_for(&server.url(), Box::new(MemorySessionStore::new()));
    queue_valid_registration(&mut app);
    app.process_async_action().await.unwrap();

    let wizard = &app.state.registration_state;
    assert!(wizard.errors.general.as_deref().unwrap().contains("Email invalid"));
    assert!(!wizard.loading);
    assert_eq!(wizard.position(), 4);
    assert_eq!(app.state.current_view, View::Registration);
    assert!(app.state.toasts.is_empty());
}

#[tokio::test]
async fn test_registration_duplicate_offers_sign_in() {
    let mut server = Server::new_async().await;
    let _mock = mock_registration(&mut server, 400, json!({"message": "User already exists"})).await;

    let mut app = app_for(&server.url(), Box::new(MemorySessionStore::new()));
    queue_valid_registration(&mut app);
    app.process_async_action().await.unwrap();

    assert!(app.state.registration_state.show_sign_in_link);
    app.state.navigate_to_sign_in_from_registration();
    assert_eq!(app.state.current_view, View::SignIn);
    assert_eq!(app.state.sign_in_state.email, "ada@example.com");
}

#[tokio::test]
async fn test_registration_database_validation_lists_each_error() {
    let mut server = Server::new_async().await;
    let _mock = mock_registration(
        &mut server,
        400,
        json!({
            "message": "Database validation errors occurred",
            "validationErrors": [
                {"message": "must be unique", "path": "contactNumber"},
                {"msg": "School not recognised"}
            ]
        }),
    )
    .await;

    let mut app = app_for(&server.url(), Box::new(MemorySessionStore::new()));
    queue_valid_registration(&mut app);
    app.process_async_action().await.unwrap();

    let general = app.state.registration_state.errors.general.clone().unwrap();
    assert!(general.contains("contactNumber: must be unique"));
    assert!(general.contains("School not recognised"));
}

#[tokio::test]
async fn test_registration_unreachable_server() {
    // Port 9 (discard) is not listening in test environments
    let mut app = app_for("http://127.0.0.1:9", Box::new(MemorySessionStore::new()));
    queue_valid_registration(&mut app);
    app.process_async_action().await.unwrap();

    assert_eq!(
        app.state.registration_state.errors.general.as_deref(),
        Some(NETWORK_MESSAGE)
    );
    assert!(!app.state.registration_state.loading);
}

#[tokio::test]
async fn test_login_locked_and_forbidden() {
    let mut server = Server::new_async().await;
    let locked = server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::PartialJson(json!({"email": "locked@example.com"})))
        .with_status(423)
        .with_body(json!({"message": "Account locked"}).to_string())
        .create_async()
        .await;
    let forbidden = server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::PartialJson(json!({"email": "banned@example.com"})))
        .with_status(403)
        .with_body("{}")
        .create_async()
        .await;

    let client = PortalApiClient::new(&config_for(&server.url()).api).unwrap();

    let err = client
        .login(&LoginRequest {
            email: "locked@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Locked));
    assert_eq!(err.user_message("fallback"), LOCKED_MESSAGE);

    let err = client
        .login(&LoginRequest {
            email: "banned@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden));
    assert_eq!(err.user_message("fallback"), FORBIDDEN_MESSAGE);

    locked.assert_async().await;
    forbidden.assert_async().await;
}

#[tokio::test]
async fn test_sign_in_persists_and_restores_session() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "token": "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0.c2ln",
                    "user": {
                        "email": "ada@example.com",
                        "firstName": "Ada",
                        "lastName": "Lovelace",
                        "role": "student",
                        "dashboardUrl": "/student/dashboard"
                    }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let session_path = dir.path().join("session.json");
    let mut app = app_for(
        &server.url(),
        Box::new(FileSessionStore::new(session_path.clone())),
    );

    app.state.navigate(Route::SignIn);
    app.state.sign_in_state.email = "ada@example.com".to_string();
    app.state.sign_in_state.password = "secret1".to_string();
    app.state.request_sign_in();
    app.process_async_action().await.unwrap();

    assert!(app.state.is_signed_in());
    assert_eq!(
        app.state.current_route,
        Route::Dashboard("/student/dashboard".to_string())
    );

    // A fresh app restores the same session from disk
    let mut restarted = app_for(&server.url(), Box::new(FileSessionStore::new(session_path)));
    restarted.init();
    let session = restarted.state.session.as_ref().expect("session restored");
    assert_eq!(session.user.display_name(), "Ada Lovelace");
    assert!(restarted.client().has_token());
    assert_eq!(restarted.state.current_view, View::Dashboard);
}

#[tokio::test]
async fn test_upload_reports_progress_to_completion() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/materials/upload")
        .match_header("authorization", "Bearer a.b.c")
        .match_header("content-type", Matcher::Regex("multipart/form-data".to_string()))
        .match_body(Matcher::Regex(r#"name="title""#.to_string()))
        .with_status(201)
        .with_body(json!({"message": "Material uploaded"}).to_string())
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("week1-notes.pdf");
    std::fs::write(&path, vec![b'x'; 200 * 1024]).unwrap();

    let config = config_for(&server.url());
    let upload = validate_material(&path, Some("Week 1 notes"), &config.materials).unwrap();

    let mut client = PortalApiClient::new(&config.api).unwrap();
    client.set_token(Some("a.b.c".to_string()));

    let (tx, rx) = watch::channel(UploadProgress::default());
    let message = client.upload_material(&upload, tx).await.unwrap();

    mock.assert_async().await;
    assert_eq!(message, "Material uploaded");
    let progress = *rx.borrow();
    assert_eq!(progress.total, 200 * 1024);
    assert_eq!(progress.percent(), 100);
    assert!(progress.is_complete());
}

#[tokio::test]
async fn test_upload_refuses_file_changed_after_validation() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/materials/upload")
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("past-paper.pdf");
    std::fs::write(&path, vec![b'x'; 1024]).unwrap();

    let config = config_for(&server.url());
    let upload = validate_material(&path, None, &config.materials).unwrap();
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();

    let mut client = PortalApiClient::new(&config.api).unwrap();
    client.set_token(Some("a.b.c".to_string()));

    let (tx, rx) = watch::channel(UploadProgress::default());
    let err = client.upload_material(&upload, tx).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidRequest(ref message) if message.contains("changed since it was checked")));
    assert_eq!(rx.borrow().sent, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_requires_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("slides.pptx");
    std::fs::write(&path, b"slides").unwrap();

    let config = config_for("http://127.0.0.1:9");
    let upload = validate_material(&path, None, &config.materials).unwrap();
    assert_eq!(upload.title, "slides");

    let client = PortalApiClient::new(&config.api).unwrap();
    let (tx, _rx) = watch::channel(UploadProgress::default());
    let err = client.upload_material(&upload, tx).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_check_in_posts_trimmed_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/attendance/check-in")
        .match_header("authorization", "Bearer a.b.c")
        .match_body(Matcher::Json(json!({"token": "qr-123"})))
        .with_status(200)
        .with_body(json!({"message": "Checked in for ICT Lesson 3"}).to_string())
        .create_async()
        .await;

    let mut client = PortalApiClient::new(&config_for(&server.url()).api).unwrap();
    client.set_token(Some("a.b.c".to_string()));

    let message = client.check_in("  qr-123\n").await.unwrap();
    mock.assert_async().await;
    assert_eq!(message, "Checked in for ICT Lesson 3");
}
