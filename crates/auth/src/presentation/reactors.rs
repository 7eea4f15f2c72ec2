//! UI reactors
//!
//! Framework-neutral counterparts of the login form, logout button and
//! session CSS classes. A host binds them to its own widgets.

use std::fmt;
use std::sync::Arc;

use kernel::error::app_error::AppError;
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::application::service::AuthService;
use crate::application::session_store::SessionStore;
use crate::domain::event::AuthEvent;
use crate::domain::transport::{Transport, TransportResponse};
use crate::presentation::dto::InvalidAttribute;

pub const LOGGED_IN_CLASS: &str = "user-is-logged-in";
pub const NOT_LOGGED_IN_CLASS: &str = "user-not-logged-in";

const LOGIN_ATTR: &str = "auth-login";

type ValidityCheck = Box<dyn Fn() -> Result<(), Value> + Send + Sync>;

// ============================================================================
// Login Form
// ============================================================================

/// Submits bound credentials through the service
pub struct LoginForm<T> {
    service: Arc<AuthService<T>>,
    credentials: Option<Value>,
    validity: Option<ValidityCheck>,
}

impl<T> LoginForm<T>
where
    T: Transport + Sync,
{
    pub fn new(service: Arc<AuthService<T>>) -> Self {
        Self {
            service,
            credentials: None,
            validity: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Value) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn set_credentials(&mut self, credentials: Value) {
        self.credentials = Some(credentials);
    }

    /// Form validation run before submitting; `Err` carries the form errors
    pub fn with_validity<F>(mut self, check: F) -> Self
    where
        F: Fn() -> Result<(), Value> + Send + Sync + 'static,
    {
        self.validity = Some(Box::new(check));
        self
    }

    pub async fn submit(&self) -> Result<TransportResponse, AppError> {
        let credentials = match &self.credentials {
            Some(credentials) if credentials.is_object() => credentials,
            other => {
                let invalid = InvalidAttribute {
                    attr_name: LOGIN_ATTR,
                    attr_value: other.clone().unwrap_or(Value::Null),
                };
                tracing::warn!(attribute = %invalid, "Login form not submitted");
                return Err(AppError::bad_request(format!("Invalid attribute {invalid}"))
                    .with_action("Bind an object of credentials to the form"));
            }
        };

        if let Some(check) = &self.validity {
            if let Err(errors) = check() {
                tracing::debug!(errors = %errors, "Login form invalid");
                return Err(AppError::unprocessable(format!("Form is invalid: {errors}")));
            }
        }

        self.service
            .login(credentials)
            .await
            .map_err(|e| e.to_app_error())
    }
}

// ============================================================================
// Logout Trigger
// ============================================================================

pub struct LogoutTrigger<T> {
    service: Arc<AuthService<T>>,
}

impl<T> LogoutTrigger<T>
where
    T: Transport + Sync,
{
    pub fn new(service: Arc<AuthService<T>>) -> Self {
        Self { service }
    }

    /// Sign out; a server failure is logged, the user is signed out anyway
    pub async fn click(&self) {
        if let Err(e) = self.service.logout().await {
            tracing::debug!(error = %e, "Logout trigger finished with server error");
        }
    }
}

// ============================================================================
// Auth Classes
// ============================================================================

/// Class to add and class to remove for a session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassChange {
    pub add: &'static str,
    pub remove: &'static str,
}

pub fn classes_for(is_authenticated: bool) -> ClassChange {
    if is_authenticated {
        ClassChange {
            add: LOGGED_IN_CLASS,
            remove: NOT_LOGGED_IN_CLASS,
        }
    } else {
        ClassChange {
            add: NOT_LOGGED_IN_CLASS,
            remove: LOGGED_IN_CLASS,
        }
    }
}

/// Tracks the session classes of an element
pub struct AuthClasses {
    store: Arc<SessionStore>,
}

impl AuthClasses {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    pub fn refresh(&self) -> ClassChange {
        classes_for(self.store.is_authenticated())
    }

    /// Apply the current classes, then again on every session update
    pub fn spawn<F>(&self, on_change: F) -> JoinHandle<()>
    where
        F: Fn(ClassChange) + Send + 'static,
    {
        let mut events = self.store.subscribe();
        let store = self.store.clone();
        on_change(self.refresh());

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::Update {
                        is_authenticated, ..
                    }) => on_change(classes_for(is_authenticated)),
                    Ok(_) => {}
                    Err(RecvError::Lagged(_)) => on_change(classes_for(store.is_authenticated())),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl fmt::Debug for AuthClasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClasses")
            .field("current", &self.refresh())
            .finish()
    }
}
