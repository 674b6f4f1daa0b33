//! # Session Context
//!
//! The signed-in user, read once from the session store and handed to the
//! controllers when they are built.
//!
//! ```text
//! SessionStore["user"] = '{"type":"Employee","email":"a@a"}'
//!          │
//!          ▼  SessionContext::load()
//! SessionContext { user: CurrentUser { Employee, Some("a@a") } }
//!          │
//!          ├──► BillListController::new(..)
//!          └──► NewBillController::new(..)
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use billed_core::CurrentUser;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Key the user blob is stored under.
pub const USER_KEY: &str = "user";

// =============================================================================
// Session Store
// =============================================================================

/// Key-value blob storage for the session (browser local storage on the
/// view side).
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str);
}

/// Session store kept in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .expect("Session mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.items
            .lock()
            .expect("Session mutex poisoned")
            .insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        self.items
            .lock()
            .expect("Session mutex poisoned")
            .remove(key);
    }
}

// =============================================================================
// Session Context
// =============================================================================

/// The current user, passed explicitly to each controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user: CurrentUser,
}

impl SessionContext {
    pub fn new(user: CurrentUser) -> Self {
        SessionContext { user }
    }

    /// Reads the user blob from `store`.
    ///
    /// ## Errors
    /// `ClientError::Session` when the blob is absent or not a user.
    pub fn load(store: &dyn SessionStore) -> ClientResult<Self> {
        let blob = store
            .get_item(USER_KEY)
            .ok_or_else(|| ClientError::Session("no user in session".to_string()))?;

        let user: CurrentUser = serde_json::from_str(&blob)
            .map_err(|e| ClientError::Session(format!("unreadable user blob: {}", e)))?;

        debug!(user_type = ?user.user_type, email = ?user.email, "Session loaded");
        Ok(SessionContext { user })
    }

    /// Writes `user` into `store` and returns its context.
    pub fn sign_in(store: &dyn SessionStore, user: CurrentUser) -> ClientResult<Self> {
        let blob = serde_json::to_string(&user)
            .map_err(|e| ClientError::Session(format!("cannot encode user: {}", e)))?;
        store.set_item(USER_KEY, blob);
        Ok(SessionContext { user })
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    /// Email of the user, empty when the session carries none.
    pub fn email(&self) -> &str {
        self.user.email_or_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billed_core::UserType;

    #[test]
    fn test_load_user_blob() {
        let store = MemorySessionStore::new();
        store.set_item(USER_KEY, r#"{"type":"Employee","email":"a@a"}"#.to_string());

        let session = SessionContext::load(&store).unwrap();
        assert_eq!(session.user().user_type, UserType::Employee);
        assert_eq!(session.email(), "a@a");
    }

    #[test]
    fn test_load_blob_without_email() {
        let store = MemorySessionStore::new();
        store.set_item(USER_KEY, r#"{"type":"Employee"}"#.to_string());

        let session = SessionContext::load(&store).unwrap();
        assert_eq!(session.email(), "");
    }

    #[test]
    fn test_missing_or_garbled_blob() {
        let store = MemorySessionStore::new();
        assert!(matches!(
            SessionContext::load(&store),
            Err(ClientError::Session(_))
        ));

        store.set_item(USER_KEY, "not json".to_string());
        assert!(matches!(
            SessionContext::load(&store),
            Err(ClientError::Session(_))
        ));

        store.remove_item(USER_KEY);
        assert!(store.get_item(USER_KEY).is_none());
    }

    #[test]
    fn test_sign_in_then_load() {
        let store = MemorySessionStore::new();
        let signed = SessionContext::sign_in(&store, CurrentUser::employee("a@a")).unwrap();
        let loaded = SessionContext::load(&store).unwrap();
        assert_eq!(signed, loaded);
    }
}
