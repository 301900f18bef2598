// ABOUTME: Session store backed by the system keychain
// Uses keyring crate for cross-platform support (macOS Keychain, Linux Secret Service)

use super::{decode_stored, Session, SessionError, SessionStore};
use keyring::Entry;

const SERVICE_NAME: &str = "ict-portal";

/// Keychain entries making up a stored session
enum SessionKey {
    Token,
    User,
}

impl SessionKey {
    fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "session_token",
            SessionKey::User => "session_user",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyringSessionStore;

impl KeyringSessionStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &SessionKey) -> Result<Entry, SessionError> {
        Ok(Entry::new(SERVICE_NAME, key.as_str())?)
    }

    fn get(key: &SessionKey) -> Result<Option<String>, SessionError> {
        match Self::entry(key)?.get_password() {
            Ok(value) => {
                tracing::debug!("Retrieved keychain entry: {}", key.as_str());
                Ok(Some(value))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                tracing::warn!("Failed to retrieve keychain entry {}: {}", key.as_str(), e);
                Err(e.into())
            }
        }
    }

    fn delete(key: &SessionKey) -> Result<(), SessionError> {
        match Self::entry(key)?.delete_credential() {
            // Already gone is fine
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for KeyringSessionStore {
    fn init(&self) -> Result<(), SessionError> {
        // Creating an entry is enough to surface a missing keychain backend
        Self::entry(&SessionKey::Token).map(|_| ())
    }

    fn read(&self) -> Result<Option<Session>, SessionError> {
        let token = Self::get(&SessionKey::Token)?;
        let user_json = Self::get(&SessionKey::User)?;

        if token.is_none() && user_json.is_none() {
            return Ok(None);
        }

        let user_value = user_json.and_then(|raw| serde_json::from_str::<serde_json::Value>(&raw).ok());
        match decode_stored(token.as_deref(), user_value.as_ref()) {
            Some((token, user)) => Ok(Some(Session {
                token,
                user,
                saved_at: None,
            })),
            None => {
                tracing::debug!("Clearing malformed session from keychain");
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        Self::entry(&SessionKey::Token)?.set_password(&session.token)?;
        Self::entry(&SessionKey::User)?.set_password(&serde_json::to_string(&session.user)?)?;
        tracing::info!("Stored session in keychain");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        Self::delete(&SessionKey::Token)?;
        Self::delete(&SessionKey::User)?;
        tracing::info!("Cleared session from keychain");
        Ok(())
    }
}
