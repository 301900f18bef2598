// ABOUTME: JSON-file session store under the portal data directory

use super::{decode_stored, Session, SessionError, SessionStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Keeps `{token, user}` in a single JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn init(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn read(&self) -> Result<Option<Session>, SessionError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // Bytes that are not UTF-8 JSON fail here and get cleared like any other bad file
        let raw: Option<serde_json::Value> = serde_json::from_slice(&content).ok();

        let decoded = raw.as_ref().and_then(|value| {
            decode_stored(
                value.get("token").and_then(|t| t.as_str()),
                value.get("user"),
            )
            .map(|(token, user)| (token, user, value.get("saved_at").cloned()))
        });

        match decoded {
            Some((token, user, saved_at)) => Ok(Some(Session {
                token,
                user,
                saved_at: saved_at.and_then(|v| serde_json::from_value(v).ok()),
            })),
            None => {
                tracing::debug!("Clearing malformed session file {}", self.path.display());
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        self.init()?;
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SessionUser;
    use tempfile::TempDir;

    fn user() -> SessionUser {
        serde_json::from_value(serde_json::json!({
            "email": "parent@example.com",
            "role": "parent",
            "dashboardUrl": "/parent"
        }))
        .unwrap()
    }

    #[test]
    fn test_save_read_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
        store.init().unwrap();

        assert!(store.read().unwrap().is_none());

        let session = Session::new("aaa.bbb.ccc".to_string(), user());
        store.save(&session).unwrap();
        assert_eq!(store.read().unwrap(), Some(session));

        store.clear().unwrap();
        assert!(!store.path().exists());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_malformed_file_is_cleared() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"token": "definitely-not-a-jwt", "user": {}}"#).unwrap();

        let store = FileSessionStore::new(path.clone());
        assert!(store.read().unwrap().is_none());
        assert!(!path.exists());

        fs::write(&path, "{ not json").unwrap();
        assert!(store.read().unwrap().is_none());
        assert!(!path.exists());

        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(store.read().unwrap().is_none());
        assert!(!path.exists());

        // A valid token inside invalid UTF-8 is still unusable
        let mut bytes = br#"{"token": "aaa.bbb.ccc", "user": {"dashboardUrl": "/x", "email": ""#.to_vec();
        bytes.extend_from_slice(&[0xc3, 0x28]);
        bytes.extend_from_slice(br#""}}"#);
        fs::write(&path, bytes).unwrap();
        assert!(store.read().unwrap().is_none());
        assert!(!path.exists());
    }
}
