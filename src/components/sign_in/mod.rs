// ABOUTME: Sign-in form for returning portal users

pub mod component;
pub mod state;

pub use component::SignInComponent;
pub use state::{SignInField, SignInState, SIGN_IN_FALLBACK_MESSAGE};
