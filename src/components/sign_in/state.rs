// ABOUTME: State for the sign-in form

use crate::api::{ApiError, LoginRequest};
use crate::components::registration::validation::is_valid_email;

/// Fallback shown when sign-in fails without a usable message
pub const SIGN_IN_FALLBACK_MESSAGE: &str = "Invalid email or password";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignInField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct SignInState {
    pub email: String,
    pub password: String,
    pub focus: SignInField,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub general_error: Option<String>,
    pub loading: bool,
}

impl SignInState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the email already filled in (e.g. after a duplicate registration)
    pub fn with_email(email: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            focus: SignInField::Password,
            ..Self::default()
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SignInField::Email => SignInField::Password,
            SignInField::Password => SignInField::Email,
        };
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            SignInField::Email => {
                self.email.push(c);
                self.email_error = None;
            }
            SignInField::Password => {
                self.password.push(c);
                self.password_error = None;
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            SignInField::Email => {
                self.email.pop();
                self.email_error = None;
            }
            SignInField::Password => {
                self.password.pop();
                self.password_error = None;
            }
        }
    }

    /// Local checks; replaces previous field errors
    pub fn validate(&mut self) -> bool {
        self.email_error = if self.email.trim().is_empty() {
            Some("Email is required".to_string())
        } else if !is_valid_email(&self.email) {
            Some("Please enter a valid email address".to_string())
        } else {
            None
        };
        self.password_error = self
            .password
            .is_empty()
            .then(|| "Password is required".to_string());

        self.email_error.is_none() && self.password_error.is_none()
    }

    /// Validate and build the request, marking the form as loading
    pub fn begin_submit(&mut self) -> Option<LoginRequest> {
        if self.loading || !self.validate() {
            return None;
        }

        self.general_error = None;
        self.loading = true;
        Some(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Record a failed attempt; the password is cleared for retyping
    pub fn fail(&mut self, err: &ApiError) {
        self.loading = false;
        self.password.clear();
        self.focus = SignInField::Password;
        self.general_error = Some(err.user_message(SIGN_IN_FALLBACK_MESSAGE));
    }
}
