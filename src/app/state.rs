// ABOUTME: Application state for the portal TUI
// Owns the current view, the wizard and sign-in forms, the session and pending async work

use crate::api::{ApiError, LoginData, LoginRequest, PortalApiClient, RegistrationPayload};
use crate::components::registration::{RegistrationState, SubmitOutcome};
use crate::components::sign_in::SignInState;
use crate::config::AppConfig;
use crate::session::{self, Session, SessionStore};
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// How long a toast stays on screen
pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Registration,
    SignIn,
    Dashboard,
}

/// Navigation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Register,
    SignIn,
    Dashboard(String),
}

impl Route {
    pub fn path(&self) -> &str {
        match self {
            Self::Home => "/",
            Self::Register => "/register",
            Self::SignIn => "/signin",
            Self::Dashboard(url) => url,
        }
    }

    pub fn view(&self) -> View {
        match self {
            Self::Home => View::Home,
            Self::Register => View::Registration,
            Self::SignIn => View::SignIn,
            Self::Dashboard(_) => View::Dashboard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    RegistrationSuccess,
    SignedIn,
    SignedOut,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    pub fn registration_success() -> Self {
        Self::new(
            ToastKind::RegistrationSuccess,
            "Registration successful! You can now sign in.",
        )
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= TOAST_LIFETIME
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    SubmitRegistration(RegistrationPayload),
    SubmitSignIn(LoginRequest),
    SignOut,
}

#[derive(Debug)]
pub struct AppState {
    pub current_view: View,
    pub current_route: Route,
    pub registration_state: RegistrationState,
    pub sign_in_state: SignInState,
    pub session: Option<Session>,
    pub toasts: Vec<Toast>,
    pub pending_async_action: Option<AsyncAction>,
    pub should_quit: bool,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            current_view: View::Home,
            current_route: Route::Home,
            registration_state: RegistrationState::new(),
            sign_in_state: SignInState::new(),
            session: None,
            toasts: Vec::new(),
            pending_async_action: None,
            should_quit: false,
            config,
        }
    }

    /// Switch screens. Forms are created fresh on entry.
    pub fn navigate(&mut self, route: Route) {
        info!("Navigating to {}", route.path());
        match route {
            Route::Register => self.registration_state = RegistrationState::new(),
            Route::SignIn => self.sign_in_state = SignInState::new(),
            Route::Home | Route::Dashboard(_) => {}
        }
        self.current_view = route.view();
        self.current_route = route;
    }

    /// Leave the wizard for sign-in, carrying the email over
    pub fn navigate_to_sign_in_from_registration(&mut self) {
        let email = self.registration_state.form.email.clone();
        self.navigate(Route::SignIn);
        self.sign_in_state = SignInState::with_email(&email);
    }

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    /// Drop expired toasts
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired(now));
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// React to the end of a registration submission
    pub fn apply_registration_outcome(&mut self, outcome: SubmitOutcome) {
        if outcome == SubmitOutcome::Registered {
            self.push_toast(Toast::registration_success());
            self.navigate(Route::Home);
        }
    }

    /// Queue the wizard's submission if its guard allows it
    pub fn request_registration_submit(&mut self) {
        if let Some(payload) = self.registration_state.begin_submit() {
            self.pending_async_action = Some(AsyncAction::SubmitRegistration(payload));
        }
    }

    pub fn request_sign_in(&mut self) {
        if let Some(request) = self.sign_in_state.begin_submit() {
            self.pending_async_action = Some(AsyncAction::SubmitSignIn(request));
        }
    }
}

/// The TUI application: state plus the collaborators async actions need
pub struct App {
    pub state: AppState,
    client: PortalApiClient,
    session_store: Box<dyn SessionStore>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = PortalApiClient::new(&config.api)?;
        let store = session::store_from_config(&config.session)?;
        Ok(Self::with_parts(config, client, store))
    }

    pub fn with_parts(
        config: AppConfig,
        client: PortalApiClient,
        session_store: Box<dyn SessionStore>,
    ) -> Self {
        Self {
            state: AppState::new(config),
            client,
            session_store,
        }
    }

    /// Restore a stored session, if any
    pub fn init(&mut self) {
        if let Some(session) = session::restore(self.session_store.as_ref()) {
            self.client.set_token(Some(session.token.clone()));
            let dashboard = session.user.dashboard_url.clone();
            self.state.session = Some(session);
            self.state.navigate(Route::Dashboard(dashboard));
        }
    }

    pub fn client(&self) -> &PortalApiClient {
        &self.client
    }

    pub async fn process_async_action(&mut self) -> Result<()> {
        let Some(action) = self.state.pending_async_action.take() else {
            return Ok(());
        };
        info!(">>> process_async_action() called with action: {:?}", action);

        match action {
            AsyncAction::SubmitRegistration(payload) => {
                let result = self.client.register(&payload).await;
                let outcome = self.state.registration_state.finish_submit(result);
                self.state.apply_registration_outcome(outcome);
            }
            AsyncAction::SubmitSignIn(request) => {
                let result = self.client.login(&request).await;
                self.complete_sign_in(result);
            }
            AsyncAction::SignOut => self.sign_out(),
        }

        Ok(())
    }

    /// Persist a successful sign-in or surface the failure on the form
    pub fn complete_sign_in(&mut self, result: Result<LoginData, ApiError>) {
        match result {
            Ok(data) => {
                let session = Session::new(data.token, data.user);
                if let Err(e) = self.session_store.save(&session) {
                    // Still signed in for this run
                    warn!("Failed to persist session: {}", e);
                }

                self.client.set_token(Some(session.token.clone()));
                let dashboard = session.user.dashboard_url.clone();
                let name = session.user.display_name();
                self.state.session = Some(session);
                self.state.sign_in_state = SignInState::new();
                self.state
                    .push_toast(Toast::new(ToastKind::SignedIn, format!("Welcome back, {name}")));
                self.state.navigate(Route::Dashboard(dashboard));
            }
            Err(err) => {
                warn!("Sign-in failed: {}", err);
                self.state.sign_in_state.fail(&err);
            }
        }
    }

    pub fn sign_out(&mut self) {
        if let Err(e) = self.session_store.clear() {
            error!("Failed to clear stored session: {}", e);
            self.state
                .push_toast(Toast::new(ToastKind::Error, "Could not clear the saved session"));
        }
        self.client.set_token(None);
        self.state.session = None;
        self.state.push_toast(Toast::new(ToastKind::SignedOut, "Signed out"));
        self.state.navigate(Route::Home);
    }
}
