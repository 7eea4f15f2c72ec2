//! Auth Service
//!
//! Public facade over the session: login, logout, fetch, out-of-band
//! session injection, route authorization and the event stream. Built with
//! [`AuthServiceBuilder`].

use std::sync::Arc;

use http::HeaderName;
use kernel::diagnostic::{Diagnostic, DiagnosticSink, TracingSink};
use platform::bus::EventBus;
use platform::header::{HeaderError, parse_header_name};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::application::authorizer::Authorizer;
use crate::application::config::{AuthConfig, RoutesPatch};
use crate::application::fetch_user::FetchUserUseCase;
use crate::application::interceptor::{InterceptedTransport, Interceptors, TokenInterceptor};
use crate::application::parser::{AuthDataParser, DefaultAuthDataParser, report_malformed_level};
use crate::application::session_store::SessionStore;
use crate::application::sign_in::SignInUseCase;
use crate::application::sign_out::SignOutUseCase;
use crate::domain::entity::current_user::CurrentUser;
use crate::domain::event::AuthEvent;
use crate::domain::transport::{Transport, TransportResponse};
use crate::domain::value_object::auth_token::AuthToken;
use crate::domain::value_object::route_requirement::RouteRequirement;
use crate::error::AuthResult;

const TOKENIZE_ORIGIN: &str = "AuthServiceProvider.tokenizeHttp";
const SET_USER_ORIGIN: &str = "AuthService.setCurrentUser";

pub struct AuthService<T> {
    transport: Arc<InterceptedTransport<T>>,
    store: Arc<SessionStore>,
    authorizer: Authorizer,
    parser: Arc<dyn AuthDataParser>,
    diagnostics: Arc<dyn DiagnosticSink>,
    config: Arc<AuthConfig>,
}

impl<T> AuthService<T>
where
    T: Transport + Sync,
{
    pub fn builder(transport: T) -> AuthServiceBuilder<T> {
        AuthServiceBuilder::new(transport)
    }

    /// Sign in with `credentials`
    pub async fn login<C>(&self, credentials: &C) -> AuthResult<TransportResponse>
    where
        C: Serialize + Sync + ?Sized,
    {
        SignInUseCase::new(
            self.transport.clone(),
            self.store.clone(),
            self.parser.clone(),
            self.diagnostics.clone(),
            self.config.clone(),
        )
        .execute(credentials)
        .await
    }

    /// Restore the session from the server
    pub async fn fetch_logged_user(&self) -> AuthResult<TransportResponse> {
        FetchUserUseCase::new(
            self.transport.clone(),
            self.store.clone(),
            self.parser.clone(),
            self.diagnostics.clone(),
            self.config.clone(),
        )
        .execute()
        .await
    }

    /// Sign out; the local session is cleared even if the server fails
    pub async fn logout(&self) -> AuthResult<TransportResponse> {
        SignOutUseCase::new(
            self.transport.clone(),
            self.store.clone(),
            self.config.clone(),
        )
        .execute()
        .await
    }
}

impl<T> AuthService<T> {
    /// Establish a session obtained without a login call
    ///
    /// Returns `false` and leaves the session alone when `user` is not an
    /// object or `token` is empty.
    pub fn set_current_user(&self, user: Value, token: &str, auth_level: Option<u64>) -> bool {
        if !user.is_object() || token.is_empty() {
            tracing::debug!("Rejected out-of-band session");
            return false;
        }
        report_malformed_level(&user, auth_level, SET_USER_ORIGIN, self.diagnostics.as_ref());
        self.store
            .set_session(Some(user), Some(token.to_string()), auth_level)
    }

    pub fn unset_current_user(&self) {
        self.store.clear_session();
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.store.current_user()
    }

    pub fn is_user_logged_in(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn authentication_token(&self) -> Option<AuthToken> {
        self.store.token()
    }

    /// May `user` (default: the signed-in user) enter `route`?
    pub fn authorize<R>(&self, route: &R, user: Option<&CurrentUser>) -> bool
    where
        R: RouteRequirement + ?Sized,
    {
        self.authorizer.authorize(route, user)
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.store.subscribe()
    }

    pub fn events(&self) -> &EventBus<AuthEvent> {
        self.store.events()
    }

    /// The intercepted transport, for the host's own requests
    pub fn http(&self) -> &InterceptedTransport<T> {
        &self.transport
    }

    /// Attach the token to every outgoing request under `header`
    ///
    /// Each call appends another interceptor. Returns the header used.
    pub fn tokenize_http(&self, header: Option<&str>) -> HeaderName {
        let name = resolve_token_header(header, &self.config.token_header, self.diagnostics.as_ref());
        self.transport
            .interceptors()
            .push(Arc::new(TokenInterceptor::new(name.clone(), self.store.clone())));
        name
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Arc<dyn DiagnosticSink> {
        &self.diagnostics
    }
}

/// Empty or missing names fall back silently; unusable ones are reported.
fn resolve_token_header(
    raw: Option<&str>,
    default: &HeaderName,
    sink: &dyn DiagnosticSink,
) -> HeaderName {
    match raw.map(parse_header_name) {
        None | Some(Err(HeaderError::EmptyName)) => default.clone(),
        Some(Ok(name)) => name,
        Some(Err(e)) => {
            sink.report(Diagnostic::new(TOKENIZE_ORIGIN, e.to_string()));
            default.clone()
        }
    }
}

/// Configuration surface of [`AuthService`]
pub struct AuthServiceBuilder<T> {
    transport: T,
    config: AuthConfig,
    parser: Arc<dyn AuthDataParser>,
    diagnostics: Arc<dyn DiagnosticSink>,
    token_headers: Vec<Option<String>>,
}

impl<T> AuthServiceBuilder<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: AuthConfig::default(),
            parser: Arc::new(DefaultAuthDataParser),
            diagnostics: Arc::new(TracingSink),
            token_headers: Vec::new(),
        }
    }

    /// Replace the whole configuration (routes patched earlier are lost)
    pub fn config(mut self, config: AuthConfig) -> Self {
        self.config = config;
        self
    }

    /// Override some endpoint routes
    pub fn use_routes(mut self, patch: RoutesPatch) -> Self {
        self.config.routes.merge(patch);
        self
    }

    /// Replace the response parser
    pub fn parse_http_auth_data<P>(mut self, parser: P) -> Self
    where
        P: AuthDataParser + 'static,
    {
        self.parser = Arc::new(parser);
        self
    }

    /// Attach the session token to outgoing requests
    ///
    /// `None` or an empty name uses the configured default header.
    pub fn tokenize_http(mut self, header: Option<&str>) -> Self {
        self.token_headers.push(header.map(str::to_string));
        self
    }

    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn build(self) -> AuthService<T> {
        let store = Arc::new(SessionStore::new(EventBus::new(self.config.event_capacity)));
        let interceptors = Interceptors::new();

        for header in &self.token_headers {
            let name = resolve_token_header(
                header.as_deref(),
                &self.config.token_header,
                self.diagnostics.as_ref(),
            );
            interceptors.push(Arc::new(TokenInterceptor::new(name, store.clone())));
        }

        tracing::debug!(
            login = %self.config.routes.login,
            logout = %self.config.routes.logout,
            fetch = %self.config.routes.fetch,
            interceptors = interceptors.len(),
            "Auth service built"
        );

        AuthService {
            transport: Arc::new(InterceptedTransport::new(self.transport, interceptors)),
            authorizer: Authorizer::new(store.clone(), self.diagnostics.clone()),
            store,
            parser: self.parser,
            diagnostics: self.diagnostics,
            config: Arc::new(self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryBackend;
    use kernel::diagnostic::RecordingSink;
    use serde_json::json;

    #[test]
    fn test_set_current_user_validates_input() {
        let service = AuthService::builder(MemoryBackend::new()).build();
        let mut rx = service.subscribe();

        assert!(!service.set_current_user(json!([{"id": 1}]), "token", None));
        assert!(!service.set_current_user(json!({"id": 1}), "", None));
        assert!(rx.try_recv().is_err());
        assert!(!service.is_user_logged_in());

        assert!(service.set_current_user(json!({"id": 1}), "token", Some(7)));
        assert_eq!(service.current_user().unwrap().auth_level().value(), 7);
        assert_eq!(service.authentication_token().unwrap().as_str(), "token");
        assert!(rx.try_recv().unwrap().is_update());

        service.unset_current_user();
        assert!(!service.is_user_logged_in());
        assert!(service.authentication_token().is_none());
    }

    #[test]
    fn test_set_current_user_reports_unusable_level() {
        let sink = Arc::new(RecordingSink::new());
        let service = AuthService::builder(MemoryBackend::new())
            .diagnostics(sink.clone())
            .build();

        assert!(service.set_current_user(json!({"id": 1, "authLevel": 1.5}), "token", None));
        assert_eq!(service.current_user().unwrap().auth_level().value(), 0);
        assert_eq!(sink.count_from(SET_USER_ORIGIN), 1);

        assert!(service.set_current_user(json!({"id": 1, "authLevel": 1000}), "token", None));
        assert_eq!(sink.count_from(SET_USER_ORIGIN), 1);
    }

    #[test]
    fn test_tokenize_http_header_resolution() {
        let sink = Arc::new(RecordingSink::new());
        let service = AuthService::builder(MemoryBackend::new())
            .diagnostics(sink.clone())
            .tokenize_http(None)
            .build();

        assert_eq!(service.http().interceptors().len(), 1);
        assert_eq!(service.tokenize_http(Some("")).as_str(), "x-auth-token");
        assert_eq!(service.tokenize_http(Some("X-Session")).as_str(), "x-session");
        assert!(sink.is_empty());

        assert_eq!(service.tokenize_http(Some("bad header")).as_str(), "x-auth-token");
        assert_eq!(sink.count_from(TOKENIZE_ORIGIN), 1);
        assert_eq!(service.http().interceptors().len(), 4);
    }

    #[test]
    fn test_use_routes_merges() {
        let service = AuthService::builder(MemoryBackend::new())
            .use_routes(RoutesPatch::default().fetch("/session"))
            .build();
        assert_eq!(service.config().routes.fetch, "/session");
        assert_eq!(service.config().routes.login, "/users/login");
    }
}
