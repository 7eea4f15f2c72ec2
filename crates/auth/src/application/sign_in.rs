//! Sign In Use Case
//!
//! Sends credentials to the login endpoint and establishes the session
//! from the response.

use std::sync::Arc;

use kernel::diagnostic::{Diagnostic, DiagnosticSink};
use serde::Serialize;

use crate::application::config::AuthConfig;
use crate::application::parser::{AuthDataParser, resolve};
use crate::application::session_store::SessionStore;
use crate::domain::event::AuthEvent;
use crate::domain::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::{AuthError, AuthResult};

/// Sign in use case
pub struct SignInUseCase<T>
where
    T: Transport,
{
    transport: Arc<T>,
    store: Arc<SessionStore>,
    parser: Arc<dyn AuthDataParser>,
    diagnostics: Arc<dyn DiagnosticSink>,
    config: Arc<AuthConfig>,
}

impl<T> SignInUseCase<T>
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

    /// POST credentials to the login route
    ///
    /// A response whose auth data is invalid still resolves `Ok`; the
    /// session is simply left signed out.
    pub async fn execute<C>(&self, credentials: &C) -> AuthResult<TransportResponse>
    where
        C: Serialize + Sync + ?Sized,
    {
        let body = match serde_json::to_value(credentials) {
            Ok(body) => body,
            Err(e) => {
                self.diagnostics.report(Diagnostic::new(
                    "AuthService.login",
                    format!("credentials could not be serialized: {e}"),
                ));
                return Err(self.reject(AuthError::InvalidInput(e.to_string())));
            }
        };

        let route = &self.config.routes.login;
        let request = TransportRequest::post(route.as_str(), Some(body));

        match self.transport.request(request).await {
            Ok(response) => {
                let data = resolve(self.parser.as_ref(), &response, self.diagnostics.as_ref());
                let authenticated =
                    self.store.set_session(data.user, data.token, data.auth_level);

                tracing::info!(
                    route = %route,
                    status = %response.status,
                    authenticated,
                    "Login resolved"
                );
                self.store
                    .events()
                    .publish(AuthEvent::LoginSuccess(response.clone()));
                Ok(response)
            }
            Err(err) => Err(self.reject(err.into())),
        }
    }

    fn reject(&self, err: AuthError) -> AuthError {
        self.store.clear_session();
        tracing::info!(route = %self.config.routes.login, "Login rejected");
        err.log();
        self.store.events().publish(AuthEvent::LoginError(err.clone()));
        err
    }
}
