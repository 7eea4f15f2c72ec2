//! Session Entity
//!
//! Either nobody is signed in, or a user and token are both present. The
//! half-authenticated states (user without token, token without user)
//! cannot be represented.

use serde_json::Value;

use crate::domain::entity::current_user::CurrentUser;
use crate::domain::value_object::auth_token::AuthToken;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { user: CurrentUser, token: AuthToken },
}

impl Session {
    /// Validate raw auth data into a session
    ///
    /// Anything short of an object profile plus a non-empty token gives
    /// `Anonymous`.
    pub(crate) fn establish(
        user_data: Option<Value>,
        token: Option<String>,
        auth_level: Option<u64>,
    ) -> Self {
        let Some(token) = token.and_then(|t| AuthToken::new(t).ok()) else {
            return Session::Anonymous;
        };
        match user_data.and_then(|data| CurrentUser::from_profile(data, auth_level)) {
            Some(user) => Session::Authenticated { user, token },
            None => Session::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_establish_authenticated() {
        let session = Session::establish(
            Some(json!({"username": "Hitmands", "authLevel": 1000})),
            Some("697b84c9c82f9abc6a80359c9125d293".to_string()),
            None,
        );
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().auth_level().value(), 1000);
        assert_eq!(
            session.token().unwrap().as_str(),
            "697b84c9c82f9abc6a80359c9125d293"
        );
    }

    #[test]
    fn test_establish_rejects_partial_data() {
        let profile = json!({"username": "Hitmands"});

        assert_eq!(
            Session::establish(Some(profile.clone()), None, None),
            Session::Anonymous
        );
        assert_eq!(
            Session::establish(Some(profile.clone()), Some(String::new()), None),
            Session::Anonymous
        );
        assert_eq!(
            Session::establish(None, Some("token".to_string()), None),
            Session::Anonymous
        );
        assert_eq!(
            Session::establish(Some(json!([profile])), Some("token".to_string()), None),
            Session::Anonymous
        );
    }

    #[test]
    fn test_anonymous_accessors() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.token().is_none());
    }
}
