//! Sign Out Use Case
//!
//! Notifies the server and signs the user out locally. The local session
//! is cleared whatever the server answers.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionStore;
use crate::domain::event::AuthEvent;
use crate::domain::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<T>
where
    T: Transport,
{
    transport: Arc<T>,
    store: Arc<SessionStore>,
    config: Arc<AuthConfig>,
}

impl<T> SignOutUseCase<T>
where
    T: Transport + Sync,
{
    pub fn new(transport: Arc<T>, store: Arc<SessionStore>, config: Arc<AuthConfig>) -> Self {
        Self {
            transport,
            store,
            config,
        }
    }

    /// POST the logout route
    pub async fn execute(&self) -> AuthResult<TransportResponse> {
        let route = &self.config.routes.logout;
        let result = self
            .transport
            .request(TransportRequest::post(route.as_str(), None))
            .await;

        self.store.clear_session();

        match result {
            Ok(response) => {
                tracing::info!(route = %route, status = %response.status, "User signed out");
                self.store
                    .events()
                    .publish(AuthEvent::LogoutSuccess(response.clone()));
                Ok(response)
            }
            Err(err) => {
                let err = AuthError::from(err);
                tracing::info!(route = %route, "Logout rejected; signed out locally");
                err.log();
                self.store.events().publish(AuthEvent::LogoutError(err.clone()));
                Err(err)
            }
        }
    }
}
