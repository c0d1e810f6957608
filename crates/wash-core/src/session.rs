//! # Session
//!
//! The bearer token lives in a key-value [`SessionStore`] under a single
//! key. A [`Session`] wraps the store with an explicit lifecycle: `init`
//! when the client starts, `teardown` on logout. It is passed to the flows
//! that need it rather than reached through a global.

use crate::error::{BookingError, BookingResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Key the bearer token is stored under
pub const TOKEN_KEY: &str = "accessToken";

/// Minimal key-value persistence
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> BookingResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> BookingResult<()>;
    fn remove(&self, key: &str) -> BookingResult<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(TOKEN_KEY.to_string(), token.into());
        }
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> BookingResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BookingResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| poisoned())?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> BookingResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| poisoned())?;
        values.remove(key);
        Ok(())
    }
}

/// JSON object on disk, one entry per key.
///
/// The file is read once and kept in memory; writes go to both.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    cache: RwLock<Option<HashMap<String, String>>>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current values, loading the file on first use
    fn values(&self) -> BookingResult<HashMap<String, String>> {
        if let Some(values) = self.cache.read().map_err(|_| poisoned())?.as_ref() {
            return Ok(values.clone());
        }
        let values = self.load()?;
        debug!(path = %self.path.display(), entries = values.len(), "session file loaded");
        *self.cache.write().map_err(|_| poisoned())? = Some(values.clone());
        Ok(values)
    }

    fn commit(&self, values: HashMap<String, String>) -> BookingResult<()> {
        self.save(&values)?;
        *self.cache.write().map_err(|_| poisoned())? = Some(values);
        Ok(())
    }

    fn load(&self) -> BookingResult<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                BookingError::Session(format!("corrupt session file {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(BookingError::Session(format!(
                "cannot read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, values: &HashMap<String, String>) -> BookingResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| BookingError::Session(format!("cannot create {}: {}", parent.display(), e)))?;
        }
        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content)
            .map_err(|e| BookingError::Session(format!("cannot write {}: {}", self.path.display(), e)))
    }
}

fn poisoned() -> BookingError {
    BookingError::Session("store lock poisoned".to_string())
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> BookingResult<Option<String>> {
        Ok(self.values()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> BookingResult<()> {
        let mut values = self.values()?;
        values.insert(key.to_string(), value.to_string());
        self.commit(values)
    }

    fn remove(&self, key: &str) -> BookingResult<()> {
        let mut values = self.values()?;
        if values.remove(key).is_some() {
            self.commit(values)?;
        }
        Ok(())
    }
}

/// Shared handle to a session store
pub type BoxedSessionStore = Arc<dyn SessionStore>;

/// Explicit session lifecycle over a [`SessionStore`]
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    store: BoxedSessionStore,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session on app start
    pub fn init(store: BoxedSessionStore) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            store,
        };
        debug!(session_id = %session.id, "session initialized");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current bearer token, read from the store on every call.
    /// Fails with [`BookingError::AuthRequired`] when there is none.
    pub fn token(&self) -> BookingResult<String> {
        self.store
            .get(TOKEN_KEY)?
            .filter(|t| !t.is_empty())
            .ok_or(BookingError::AuthRequired)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_ok()
    }

    /// Persist a freshly issued token
    pub fn store_token(&self, token: &str) -> BookingResult<()> {
        self.store.set(TOKEN_KEY, token)?;
        info!(session_id = %self.id, "session token stored");
        Ok(())
    }

    /// Drop the token if `err` says the backend rejected it
    pub fn observe_error(&self, err: &BookingError) {
        if err.clears_session() {
            warn!(session_id = %self.id, "backend rejected token, clearing session");
            if let Err(e) = self.store.remove(TOKEN_KEY) {
                warn!("failed to clear session token: {}", e);
            }
        }
    }

    /// Logout
    pub fn teardown(&self) -> BookingResult<()> {
        self.store.remove(TOKEN_KEY)?;
        info!(session_id = %self.id, "session torn down");
        Ok(())
    }
}
