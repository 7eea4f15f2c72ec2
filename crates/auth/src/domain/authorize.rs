//! Authorization rule
//!
//! A route is accessible when it requires nothing, or when a user is
//! signed in and their level meets the route's minimum.

use crate::domain::entity::{current_user::CurrentUser, session::Session};
use crate::domain::value_object::route_requirement::Requirement;

/// Decide access
///
/// A supplied `user` is judged on its own level; without one the session's
/// user is used, and an anonymous session is denied.
pub fn authorize(requirement: Requirement, user: Option<&CurrentUser>, session: &Session) -> bool {
    match requirement {
        Requirement::Open => true,
        Requirement::Unrecognized => false,
        Requirement::MinLevel(required) => user
            .or_else(|| session.user())
            .is_some_and(|u| u.auth_level().satisfies(required)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signed_in(level: u64) -> Session {
        Session::establish(
            Some(json!({"username": "Hitmands", "authLevel": level})),
            Some("token".to_string()),
            None,
        )
    }

    #[test]
    fn test_open_routes_always_allowed() {
        assert!(authorize(Requirement::Open, None, &Session::Anonymous));
        assert!(authorize(Requirement::Open, None, &signed_in(1)));
    }

    #[test]
    fn test_min_level_requires_session() {
        assert!(!authorize(Requirement::MinLevel(1), None, &Session::Anonymous));
        assert!(authorize(Requirement::MinLevel(100), None, &signed_in(1000)));
        assert!(authorize(Requirement::MinLevel(1000), None, &signed_in(1000)));
        assert!(!authorize(Requirement::MinLevel(1001), None, &signed_in(1000)));
    }

    #[test]
    fn test_supplied_user_overrides_session_user() {
        let session = signed_in(1000);
        let weaker = CurrentUser::from_profile(json!({"authLevel": 10}), None).unwrap();
        assert!(!authorize(Requirement::MinLevel(100), Some(&weaker), &session));
        assert!(authorize(Requirement::MinLevel(10), Some(&weaker), &session));
    }

    #[test]
    fn test_supplied_user_judged_without_session() {
        let user = CurrentUser::from_profile(json!({"authLevel": 1000}), None).unwrap();
        assert!(authorize(Requirement::MinLevel(1), Some(&user), &Session::Anonymous));
        assert!(!authorize(Requirement::MinLevel(1001), Some(&user), &Session::Anonymous));
    }

    #[test]
    fn test_unrecognized_denied() {
        assert!(!authorize(Requirement::Unrecognized, None, &signed_in(1000)));
    }
}
