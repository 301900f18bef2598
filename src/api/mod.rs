// ABOUTME: Portal HTTP API integration
// Typed requests, a reqwest client and a single place where failure bodies are decoded

pub mod client;
pub mod error;
pub mod types;

pub use client::PortalApiClient;
pub use error::{ApiError, ValidationItem};
pub use types::{LoginData, LoginRequest, RegistrationPayload, SessionUser};

/// Anything that can accept a finished registration
#[allow(async_fn_in_trait)]
pub trait RegistrationBackend {
    async fn submit_registration(&self, payload: &RegistrationPayload) -> Result<(), ApiError>;
}
