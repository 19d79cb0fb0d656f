use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::StorageError;

/// Durable client-side state: the persist flag and the refresh credential.
///
/// Mirrors the browser split of localStorage (persist flag) and a cookie
/// (refresh token): one fixed key each, not namespaced per user, so only
/// one session can be remembered per profile at a time.
///
/// Reads are infallible by design: missing or corrupt state degrades to
/// "nothing stored", which the bootstrapper treats as unauthenticated.
pub trait PersistentStorage: Send + Sync + 'static {
    fn load_persist(&self) -> bool;
    fn store_persist(&self, persist: bool) -> Result<(), StorageError>;
    fn load_refresh_token(&self) -> Option<String>;
    fn store_refresh_token(&self, token: &str) -> Result<(), StorageError>;
    fn clear_refresh_token(&self) -> Result<(), StorageError>;
}

impl<S: PersistentStorage> PersistentStorage for std::sync::Arc<S> {
    fn load_persist(&self) -> bool {
        (**self).load_persist()
    }

    fn store_persist(&self, persist: bool) -> Result<(), StorageError> {
        (**self).store_persist(persist)
    }

    fn load_refresh_token(&self) -> Option<String> {
        (**self).load_refresh_token()
    }

    fn store_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        (**self).store_refresh_token(token)
    }

    fn clear_refresh_token(&self) -> Result<(), StorageError> {
        (**self).clear_refresh_token()
    }
}

/// Volatile storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryStorage {
    state: Mutex<StoredState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded storage, as if a previous session left state behind.
    pub fn with_state(persist: bool, refresh_token: Option<String>) -> Self {
        Self {
            state: Mutex::new(StoredState {
                persist,
                refresh_token,
            }),
        }
    }
}

impl PersistentStorage for InMemoryStorage {
    fn load_persist(&self) -> bool {
        self.state.lock().unwrap().persist
    }

    fn store_persist(&self, persist: bool) -> Result<(), StorageError> {
        self.state.lock().unwrap().persist = persist;
        Ok(())
    }

    fn load_refresh_token(&self) -> Option<String> {
        self.state.lock().unwrap().refresh_token.clone()
    }

    fn store_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        self.state.lock().unwrap().refresh_token = Some(token.to_string());
        Ok(())
    }

    fn clear_refresh_token(&self) -> Result<(), StorageError> {
        self.state.lock().unwrap().refresh_token = None;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredState {
    persist: bool,
    refresh_token: Option<String>,
}

/// JSON-file-backed storage.
///
/// Every write rewrites the whole file, so the latest value is on disk
/// even if the process dies right after a change.
pub struct FileStorage {
    path: PathBuf,
    state: Mutex<StoredState>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default();

        Self {
            path,
            state: Mutex::new(state),
        }
    }

    fn flush(&self, state: &StoredState) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(state)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::write(&self.path, bytes).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

impl PersistentStorage for FileStorage {
    fn load_persist(&self) -> bool {
        self.state.lock().unwrap().persist
    }

    fn store_persist(&self, persist: bool) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.persist = persist;
        self.flush(&state)
    }

    fn load_refresh_token(&self) -> Option<String> {
        self.state.lock().unwrap().refresh_token.clone()
    }

    fn store_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.refresh_token = Some(token.to_string());
        self.flush(&state)
    }

    fn clear_refresh_token(&self) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.refresh_token = None;
        self.flush(&state)
    }
}
