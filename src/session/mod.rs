// ABOUTME: Signed-in session persistence behind an injectable store
// Stored tokens are shape-checked before use; malformed data is dropped silently

use crate::api::SessionUser;
use crate::config::{AppConfig, SessionBackend, SessionConfig};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod file_store;
pub mod keyring_store;
pub mod memory_store;

pub use file_store::FileSessionStore;
pub use keyring_store::KeyringSessionStore;
pub use memory_store::MemorySessionStore;

lazy_static! {
    static ref JWT_SHAPE: Regex =
        Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").expect("valid JWT regex");
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Session storage unavailable: {0}")]
    Unavailable(String),
}

/// A signed-in user and their bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: String, user: SessionUser) -> Self {
        Self {
            token,
            user,
            saved_at: Some(Utc::now()),
        }
    }
}

/// Whether a token looks like a compact JWT (three base64url segments)
pub fn is_jwt_shaped(token: &str) -> bool {
    JWT_SHAPE.is_match(token)
}

/// Turn raw stored values into a session, or `None` if either is unusable
pub(crate) fn decode_stored(
    token: Option<&str>,
    user: Option<&serde_json::Value>,
) -> Option<(String, SessionUser)> {
    let token = token.filter(|t| is_jwt_shaped(t))?;
    let user: SessionUser = serde_json::from_value(user?.clone()).ok()?;
    Some((token.to_string(), user))
}

/// Storage for the signed-in session with an explicit lifecycle
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Prepare the backing storage (create directories, probe keychain)
    fn init(&self) -> Result<(), SessionError>;

    /// Read the stored session. Malformed data is cleared and reported as `None`.
    fn read(&self) -> Result<Option<Session>, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// Restore a session on startup; storage failures are logged, never fatal
pub fn restore(store: &dyn SessionStore) -> Option<Session> {
    if let Err(e) = store.init() {
        tracing::warn!("Session store init failed: {}", e);
        return None;
    }

    match store.read() {
        Ok(Some(session)) => {
            tracing::info!("Restored session for {}", session.user.display_name());
            Some(session)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Failed to read stored session: {}", e);
            None
        }
    }
}

/// Build the store selected in config
pub fn store_from_config(config: &SessionConfig) -> anyhow::Result<Box<dyn SessionStore>> {
    match config.backend {
        SessionBackend::File => {
            let path = AppConfig::base_dir()?.join("session.json");
            Ok(Box::new(FileSessionStore::new(path)))
        }
        SessionBackend::Keyring => Ok(Box::new(KeyringSessionStore::new())),
    }
}
