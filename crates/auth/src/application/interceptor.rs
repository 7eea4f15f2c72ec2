//! Request Interceptors
//!
//! Outgoing requests pass through an ordered chain of interceptors before
//! they reach the transport. Token attachment is one such interceptor.

use std::sync::{Arc, PoisonError, RwLock};

use http::HeaderName;

use crate::application::session_store::SessionStore;
use crate::domain::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;

/// Rewrites a request before it is sent
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut TransportRequest);
}

/// Attaches the session token under a header while signed in
pub struct TokenInterceptor {
    header: HeaderName,
    store: Arc<SessionStore>,
}

impl TokenInterceptor {
    pub fn new(header: HeaderName, store: Arc<SessionStore>) -> Self {
        Self { header, store }
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl RequestInterceptor for TokenInterceptor {
    fn intercept(&self, request: &mut TransportRequest) {
        let Some(token) = self.store.token() else {
            return;
        };
        match platform::header::set_header(&mut request.headers, &self.header, token.as_str()) {
            Ok(()) => tracing::debug!(header = %self.header, path = %request.path, "Token attached"),
            Err(e) => tracing::warn!(error = %e, "Token not attached"),
        }
    }
}

/// Shared append-only interceptor chain
#[derive(Clone, Default)]
pub struct Interceptors {
    chain: Arc<RwLock<Vec<Arc<dyn RequestInterceptor>>>>,
}

impl Interceptors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, interceptor: Arc<dyn RequestInterceptor>) {
        self.chain
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.chain.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every interceptor in registration order
    pub fn apply(&self, request: &mut TransportRequest) {
        // Interceptors run outside the lock so they can register others.
        let chain = self
            .chain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for interceptor in chain {
            interceptor.intercept(request);
        }
    }
}

impl std::fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors")
            .field("len", &self.len())
            .finish()
    }
}

/// Transport that runs the interceptor chain before delegating
#[derive(Debug)]
pub struct InterceptedTransport<T> {
    inner: T,
    interceptors: Interceptors,
}

impl<T> InterceptedTransport<T> {
    pub fn new(inner: T, interceptors: Interceptors) -> Self {
        Self {
            inner,
            interceptors,
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }
}

impl<T> Transport for InterceptedTransport<T>
where
    T: Transport + Sync,
{
    async fn request(
        &self,
        mut request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        self.interceptors.apply(&mut request);
        self.inner.request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Stamp(&'static str);

    impl RequestInterceptor for Stamp {
        fn intercept(&self, request: &mut TransportRequest) {
            request.path.push_str(self.0);
        }
    }

    fn header() -> HeaderName {
        HeaderName::from_static("x-auth-token")
    }

    #[test]
    fn test_token_attached_only_when_signed_in() {
        let store = Arc::new(SessionStore::default());
        let interceptor = TokenInterceptor::new(header(), store.clone());

        let mut request = TransportRequest::get("/users/me");
        interceptor.intercept(&mut request);
        assert!(request.headers.is_empty());

        store.set_session(Some(json!({"id": 1})), Some("abc".to_string()), None);
        let mut request = TransportRequest::get("/users/me");
        interceptor.intercept(&mut request);
        assert_eq!(request.headers.get("x-auth-token").unwrap(), "abc");
    }

    #[test]
    fn test_unrepresentable_token_leaves_request_unchanged() {
        let store = Arc::new(SessionStore::default());
        store.set_session(Some(json!({"id": 1})), Some("bad\ntoken".to_string()), None);
        let interceptor = TokenInterceptor::new(header(), store);

        let mut request = TransportRequest::get("/users/me");
        interceptor.intercept(&mut request);
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_chain_runs_in_order() {
        let interceptors = Interceptors::new();
        assert!(interceptors.is_empty());
        interceptors.push(Arc::new(Stamp("/a")));
        interceptors.clone().push(Arc::new(Stamp("/b")));

        let mut request = TransportRequest::get("");
        interceptors.apply(&mut request);
        assert_eq!(request.path, "/a/b");
        assert_eq!(interceptors.len(), 2);
    }
}
