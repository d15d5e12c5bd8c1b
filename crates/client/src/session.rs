//! Explicit client-side session state.
//!
//! Holds the bearer token and publishes the current user on a
//! [`tokio::sync::watch`] channel. Every login, logout and restore sends a
//! new value, so subscribers always see the latest identity.

use std::sync::RwLock;

use tokio::sync::watch;

use crate::models::SessionUser;

/// Token plus observable current user for one client.
#[derive(Debug)]
pub struct ClientSession {
    token: RwLock<Option<String>>,
    user_tx: watch::Sender<Option<SessionUser>>,
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientSession {
    pub fn new() -> Self {
        let (user_tx, _) = watch::channel(None);
        Self {
            token: RwLock::new(None),
            user_tx,
        }
    }

    /// Receive the current user now and on every change.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.user_tx.subscribe()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.user_tx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// True when a token is held and it has been confirmed for a user.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.user_tx.borrow().is_some()
    }

    pub(crate) fn set_token(&self, token: Option<String>) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }

    pub(crate) fn establish(&self, token: String, user: SessionUser) {
        self.set_token(Some(token));
        self.user_tx.send_replace(Some(user));
    }

    pub(crate) fn clear(&self) {
        self.set_token(None);
        self.user_tx.send_replace(None);
    }
}
