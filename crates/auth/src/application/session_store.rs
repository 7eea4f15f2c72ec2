//! Session Store
//!
//! Single source of truth for who is signed in. Every change is announced
//! on the event bus as `AuthEvent::Update`.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use platform::bus::EventBus;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::domain::entity::{current_user::CurrentUser, session::Session};
use crate::domain::event::AuthEvent;
use crate::domain::value_object::auth_token::AuthToken;

pub struct SessionStore {
    session: RwLock<Session>,
    events: EventBus<AuthEvent>,
}

impl SessionStore {
    pub fn new(events: EventBus<AuthEvent>) -> Self {
        Self {
            session: RwLock::new(Session::Anonymous),
            events,
        }
    }

    /// Replace the session
    ///
    /// Invalid data (non-object user, missing or empty token) signs the user
    /// out. The update is published before the write lock is released, so
    /// subscribers see updates in mutation order. Returns whether the new
    /// session is authenticated.
    pub(crate) fn set_session(
        &self,
        user_data: Option<Value>,
        token: Option<String>,
        auth_level: Option<u64>,
    ) -> bool {
        let next = Session::establish(user_data, token, auth_level);
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *session = next;

        let is_authenticated = session.is_authenticated();
        self.events.publish(AuthEvent::Update {
            user: session.user().cloned(),
            is_authenticated,
        });
        tracing::debug!(authenticated = is_authenticated, "Session replaced");
        is_authenticated
    }

    pub(crate) fn clear_session(&self) {
        self.set_session(None, None, None);
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the current session without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.read_guard())
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.read_guard().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_guard().is_authenticated()
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.read_guard().token().cloned()
    }

    pub fn snapshot(&self) -> Session {
        self.read_guard().clone()
    }

    pub fn events(&self) -> &EventBus<AuthEvent> {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(EventBus::default())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("events", &self.events)
            .finish()
    }
}
