//! Route authorization against the live session

use std::sync::Arc;

use kernel::diagnostic::{Diagnostic, DiagnosticSink};

use crate::application::session_store::SessionStore;
use crate::domain::authorize::authorize;
use crate::domain::entity::{current_user::CurrentUser, session::Session};
use crate::domain::value_object::route_requirement::{Requirement, RouteRequirement};

/// Origin of authorization reports and transition rejections
pub const AUTHORIZE_ORIGIN: &str = "AuthService.authorize";

#[derive(Clone)]
pub struct Authorizer {
    store: Arc<SessionStore>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Authorizer {
    pub fn new(store: Arc<SessionStore>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self { store, diagnostics }
    }

    /// May `user` (default: the signed-in user) enter `route`?
    ///
    /// Something that is not a route is reported and denied.
    pub fn authorize<R>(&self, route: &R, user: Option<&CurrentUser>) -> bool
    where
        R: RouteRequirement + ?Sized,
    {
        let requirement = self.requirement_of(route);
        self.store
            .read(|session| authorize(requirement, user, session))
    }

    /// Same decision against a session the caller already holds
    ///
    /// Lets a caller decide and describe the outcome from one snapshot.
    pub fn authorize_session<R>(
        &self,
        route: &R,
        user: Option<&CurrentUser>,
        session: &Session,
    ) -> bool
    where
        R: RouteRequirement + ?Sized,
    {
        authorize(self.requirement_of(route), user, session)
    }

    fn requirement_of<R>(&self, route: &R) -> Requirement
    where
        R: RouteRequirement + ?Sized,
    {
        let requirement = route.requirement();
        if requirement == Requirement::Unrecognized {
            self.diagnostics.report(Diagnostic::new(
                AUTHORIZE_ORIGIN,
                "first param must be a route object",
            ));
        }
        requirement
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::route::Route;
    use kernel::diagnostic::RecordingSink;
    use serde_json::json;

    fn authorizer() -> (Authorizer, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let store = Arc::new(SessionStore::default());
        (Authorizer::new(store, sink.clone()), sink)
    }

    #[test]
    fn test_uses_session_user() {
        let (authorizer, _) = authorizer();
        let me = Route::new("users.me", "/me").with_min_auth_level(100);
        assert!(!authorizer.authorize(&me, None));

        authorizer.store().set_session(
            Some(json!({"authLevel": 1000})),
            Some("token".to_string()),
            None,
        );
        assert!(authorizer.authorize(&me, None));
    }

    #[test]
    fn test_raw_route_values() {
        let (authorizer, sink) = authorizer();
        assert!(authorizer.authorize(&json!({"name": "home"}), None));
        assert!(!authorizer.authorize(&json!({"data": {"minAuthLevel": 1}}), None));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_authorize_session_ignores_live_store() {
        let (authorizer, _) = authorizer();
        let me = Route::new("users.me", "/me").with_min_auth_level(100);
        authorizer.store().set_session(
            Some(json!({"authLevel": 1000})),
            Some("token".to_string()),
            None,
        );

        assert!(!authorizer.authorize_session(&me, None, &Session::Anonymous));
        let snapshot = authorizer.store().snapshot();
        assert!(authorizer.authorize_session(&me, None, &snapshot));
    }

    #[test]
    fn test_non_route_reported_and_denied() {
        let (authorizer, sink) = authorizer();
        assert!(!authorizer.authorize(&json!("users.me"), None));
        assert_eq!(sink.count_from(AUTHORIZE_ORIGIN), 1);
    }
}
