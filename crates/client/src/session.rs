//! Session token storage.
//!
//! The session is the single piece of process-wide state the client keeps.
//! It lives behind the [`SessionStore`] trait so the API client can be
//! handed an in-memory store in tests and a file-backed store in the
//! binaries, instead of reading a global ad hoc.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from reading or writing the persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An authenticated session.
///
/// Holds only the opaque bearer token; everything else about the user is
/// fetched from the API when needed.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// The bearer token. Callers expose it only at the request boundary.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }
}

/// Durable storage for the session token.
pub trait SessionStore: Send + Sync {
    /// The current session, if one is stored.
    fn get(&self) -> Result<Option<Session>, SessionError>;

    /// Replaces the stored session.
    fn set(&self, session: &Session) -> Result<(), SessionError>;

    /// Removes the stored session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), SessionError>;
}

// =============================================================================
// InMemorySessionStore
// =============================================================================

/// Session store that lives and dies with the process. Used in tests and
/// for ephemeral logins.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self) -> Result<Option<Session>, SessionError> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn set(&self, session: &Session) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}

// =============================================================================
// FileSessionStore
// =============================================================================

/// On-disk wire format for the persisted session.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// Session store backed by a single JSON file.
///
/// The file holds only the token under one key, so a missing file reads
/// as "not logged in" and a hand-edited one is at worst a parse error.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSession = serde_json::from_str(&raw)?;
        Ok(Some(Session::new(stored.token)))
    }

    fn set(&self, session: &Session) -> Result<(), SessionError> {
        let stored = StoredSession {
            token: session.token().expose_secret().to_string(),
        };
        let raw = serde_json::to_string(&stored)?;
        std::fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_roundtrip() {
        let store = InMemorySessionStore::new();
        assert!(store.get().expect("get").is_none());

        store.set(&Session::new("tok-123")).expect("set");
        let session = store.get().expect("get").expect("stored");
        assert_eq!(session.token().expose_secret(), "tok-123");

        store.clear().expect("clear");
        assert!(store.get().expect("get").is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.get().expect("get").is_none());
        store.set(&Session::new("tok-456")).expect("set");
        let session = store.get().expect("get").expect("stored");
        assert_eq!(session.token().expose_secret(), "tok-456");

        store.clear().expect("clear");
        assert!(store.get().expect("get").is_none());
        // Clearing twice is also fine.
        store.clear().expect("clear again");
    }

    #[test]
    fn test_file_store_rejects_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").expect("write");

        let store = FileSessionStore::new(path);
        assert!(matches!(store.get(), Err(SessionError::Malformed(_))));
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::new("very-secret");
        let debug = format!("{session:?}");
        assert!(!debug.contains("very-secret"));
    }
}
