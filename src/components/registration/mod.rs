// ABOUTME: Registration wizard module
// Four-step student sign-up with per-step validation and a guarded final submission

pub mod component;
pub mod state;
pub mod validation;

pub use component::RegistrationComponent;
pub use state::{
    Address, FormField, RegistrationForm, RegistrationState, RegistrationStep, Role, StepErrors,
    SubmitOutcome, REGISTRATION_FALLBACK_MESSAGE,
};
