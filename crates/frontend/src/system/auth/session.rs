//! Client-held session: bearer token plus cached user profile.
//!
//! The session mirrors itself into a [`KeyValueStore`] on every change so it
//! survives a page reload. Empty tokens are normalized to "no token".

use std::cell::RefCell;
use std::rc::Rc;

use contracts::system::auth::UserProfile;

use super::storage::KeyValueStore;
use crate::shared::config::StorageConfig;
use crate::shared::http::middleware::TokenSource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Shared handle to the live session and its persisted copy
#[derive(Clone)]
pub struct SessionHandle {
    inner: Rc<RefCell<Session>>,
    storage: Rc<dyn KeyValueStore>,
    keys: StorageConfig,
}

impl SessionHandle {
    /// Restore the session from storage
    pub fn restore(storage: Rc<dyn KeyValueStore>, keys: StorageConfig) -> Self {
        let token = storage.get(&keys.token_key).filter(|t| !t.is_empty());
        let user = storage
            .get(&keys.user_key)
            .and_then(|raw| match serde_json::from_str::<UserProfile>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("Discarding unreadable persisted user: {}", e);
                    None
                }
            });

        if token.is_some() {
            log::debug!("Session restored from storage");
        }

        Self {
            inner: Rc::new(RefCell::new(Session { token, user })),
            storage,
            keys,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.inner.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .borrow()
            .token
            .clone()
            .filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().is_authenticated()
    }

    pub fn set_token(&self, token: &str) {
        if token.is_empty() {
            self.inner.borrow_mut().token = None;
            self.storage.remove(&self.keys.token_key);
            return;
        }
        self.inner.borrow_mut().token = Some(token.to_string());
        self.storage.set(&self.keys.token_key, token);
    }

    pub fn set_user(&self, user: &UserProfile) {
        self.inner.borrow_mut().user = Some(user.clone());
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.set(&self.keys.user_key, &raw),
            Err(e) => log::warn!("Failed to persist user: {}", e),
        }
    }

    /// Drop token and user, both in memory and in storage
    pub fn clear(&self) {
        *self.inner.borrow_mut() = Session::default();
        self.storage.remove(&self.keys.token_key);
        self.storage.remove(&self.keys.user_key);
    }
}

impl TokenSource for SessionHandle {
    fn token(&self) -> Option<String> {
        SessionHandle::token(self)
    }
}
