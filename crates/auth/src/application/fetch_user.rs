//! Fetch User Use Case
//!
//! Asks the server who the current user is, typically on startup to
//! restore a session the server still remembers.

use std::sync::Arc;

use kernel::diagnostic::DiagnosticSink;

use crate::application::config::AuthConfig;
use crate::application::parser::{AuthDataParser, resolve};
use crate::application::session_store::SessionStore;
use crate::domain::event::AuthEvent;
use crate::domain::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::{AuthError, AuthResult};

/// Fetch user use case
pub struct FetchUserUseCase<T>
where
    T: Transport,
{
    transport: Arc<T>,
    store: Arc<SessionStore>,
    parser: Arc<dyn AuthDataParser>,
    diagnostics: Arc<dyn DiagnosticSink>,
    config: Arc<AuthConfig>,
}

impl<T> FetchUserUseCase<T>
where
    T: Transport + Sync,
{
    pub fn new(
        transport: Arc<T>,
        store: Arc<SessionStore>,
        parser: Arc<dyn AuthDataParser>,
        diagnostics: Arc<dyn DiagnosticSink>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            transport,
            store,
            parser,
            diagnostics,
            config,
        }
    }

    /// GET the fetch route
    pub async fn execute(&self) -> AuthResult<TransportResponse> {
        let route = &self.config.routes.fetch;

        match self.transport.request(TransportRequest::get(route.as_str())).await {
            Ok(response) => {
                let data = resolve(self.parser.as_ref(), &response, self.diagnostics.as_ref());
                let authenticated =
                    self.store.set_session(data.user, data.token, data.auth_level);

                tracing::info!(
                    route = %route,
                    status = %response.status,
                    authenticated,
                    "Current user fetched"
                );
                self.store
                    .events()
                    .publish(AuthEvent::FetchSuccess(response.clone()));
                Ok(response)
            }
            Err(err) => {
                self.store.clear_session();
                let err = AuthError::from(err);
                tracing::info!(route = %route, "Current user fetch rejected");
                err.log();
                self.store.events().publish(AuthEvent::FetchError(err.clone()));
                Err(err)
            }
        }
    }
}
