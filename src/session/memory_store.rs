// ABOUTME: In-memory session store for tests and throwaway runs

use super::{decode_stored, Session, SessionError, SessionStore};
use std::sync::Mutex;

/// Raw stored values, kept unvalidated so malformed data can be simulated
#[derive(Debug, Default)]
struct RawSession {
    token: Option<String>,
    user: Option<serde_json::Value>,
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<RawSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with arbitrary raw values
    pub fn with_raw(token: &str, user: serde_json::Value) -> Self {
        Self {
            inner: Mutex::new(RawSession {
                token: Some(token.to_string()),
                user: Some(user),
            }),
        }
    }

    /// Whether anything is stored, valid or not
    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .map(|raw| raw.token.is_none() && raw.user.is_none())
            .unwrap_or(true)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RawSession>, SessionError> {
        self.inner
            .lock()
            .map_err(|_| SessionError::Unavailable("session lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn init(&self) -> Result<(), SessionError> {
        Ok(())
    }

    fn read(&self) -> Result<Option<Session>, SessionError> {
        let mut raw = self.lock()?;
        if raw.token.is_none() && raw.user.is_none() {
            return Ok(None);
        }

        match decode_stored(raw.token.as_deref(), raw.user.as_ref()) {
            Some((token, user)) => Ok(Some(Session {
                token,
                user,
                saved_at: None,
            })),
            None => {
                *raw = RawSession::default();
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut raw = self.lock()?;
        raw.token = Some(session.token.clone());
        raw.user = Some(serde_json::to_value(&session.user)?);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.lock()? = RawSession::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_token_is_cleared() {
        let store = MemorySessionStore::with_raw("garbage", serde_json::json!({}));
        assert!(!store.is_empty());
        assert!(store.read().unwrap().is_none());
        assert!(store.is_empty());
    }
}
