//! # Session Store
//!
//! Key-value store holding the signed-in user under `"user"`, written by
//! the login flow and only read here.
//!
//! ```text
//! SessionStore["user"] = {"type":"Employee","email":"a@a"}
//!          │
//!          ▼  Session::load
//! Session { user: User { role: Employee, email: Some("a@a") } }
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use billed_core::{User, UserRole};
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Key under which the signed-in user is kept.
pub const USER_KEY: &str = "user";

/// Read access to the persisted session entries.
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
}

/// The signed-in user, passed explicitly to the pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
}

impl Session {
    /// Reads and parses the `"user"` entry.
    pub fn load(store: &dyn SessionStore) -> StoreResult<Session> {
        let raw = store
            .get_item(USER_KEY)
            .ok_or_else(|| StoreError::Session("no user is signed in".to_string()))?;

        let user: User = serde_json::from_str(&raw).map_err(|e| {
            warn!(error = %e, "Unreadable session user entry");
            StoreError::Session(format!("unreadable user entry: {}", e))
        })?;

        Ok(Session { user })
    }

    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }
}

// =============================================================================
// In-Memory Session Store
// =============================================================================

/// Session store backed by a map.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore::default()
    }

    /// Store pre-populated with a signed-in user.
    pub fn signed_in(user: &User) -> StoreResult<Self> {
        let store = MemorySessionStore::new();
        store.sign_in(user)?;
        Ok(store)
    }

    /// Writes the `"user"` entry the way the login flow does.
    pub fn sign_in(&self, user: &User) -> StoreResult<()> {
        let raw = serde_json::to_string(user)
            .map_err(|e| StoreError::Session(format!("cannot encode user: {}", e)))?;
        self.set_item(USER_KEY, raw)
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) -> StoreResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| StoreError::Session("session store lock poisoned".to_string()))?;
        items.insert(key.to_string(), value.into());
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }
}
