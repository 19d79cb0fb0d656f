use std::sync::RwLock;

use crate::errors::StorageError;
use crate::storage::PersistentStorage;

/// In-memory session for the current application load.
///
/// No access token means "not authenticated for this render".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub access_token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// The one session context for the process.
///
/// Consumers receive a handle to this store explicitly; every mutation is
/// a single state transition from the reader's point of view, and persist
/// changes are written through to durable storage immediately.
pub struct SessionStore<S: PersistentStorage> {
    session: RwLock<Session>,
    persist: RwLock<bool>,
    storage: S,
}

impl<S: PersistentStorage> SessionStore<S> {
    /// Create a store, reading the persist flag left by a previous load.
    pub fn new(storage: S) -> Self {
        let persist = storage.load_persist();

        Self {
            session: RwLock::new(Session::default()),
            persist: RwLock::new(persist),
            storage,
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.session.read().unwrap().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().unwrap().access_token.clone()
    }

    pub fn persist(&self) -> bool {
        *self.persist.read().unwrap()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.load_refresh_token()
    }

    /// Replace the session after an interactive login.
    ///
    /// Swaps the whole session in one write, stores the refresh
    /// credential durably, and writes through the persist choice.
    ///
    /// # Errors
    /// * `WriteFailed` - Durable state could not be written
    pub fn set_session(
        &self,
        user_id: impl Into<String>,
        persist: bool,
        access_token: impl Into<String>,
        refresh_token: &str,
    ) -> Result<(), StorageError> {
        {
            let mut session = self.session.write().unwrap();
            *session = Session {
                user_id: Some(user_id.into()),
                access_token: Some(access_token.into()),
            };
        }
        self.storage.store_refresh_token(refresh_token)?;
        self.set_persist(persist)
    }

    /// Adopt an access token obtained by silent refresh.
    ///
    /// The user identity stays whatever it was; only token presence
    /// changes.
    pub fn set_access_token(&self, access_token: impl Into<String>) {
        self.session.write().unwrap().access_token = Some(access_token.into());
    }

    /// Update the durable "remember me" flag.
    ///
    /// Written through immediately so a reload observes the latest value
    /// even if the tab was closed ungracefully.
    ///
    /// # Errors
    /// * `WriteFailed` - Durable state could not be written
    pub fn set_persist(&self, persist: bool) -> Result<(), StorageError> {
        *self.persist.write().unwrap() = persist;
        self.storage.store_persist(persist)
    }

    /// Logout: reset to unauthenticated, clear the durable persist flag
    /// and remove the stored refresh credential.
    ///
    /// # Errors
    /// * `WriteFailed` - Durable state could not be written
    pub fn clear_session(&self) -> Result<(), StorageError> {
        *self.session.write().unwrap() = Session::default();
        self.set_persist(false)?;
        self.storage.clear_refresh_token()
    }
}
