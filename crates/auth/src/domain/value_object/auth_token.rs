//! Auth Token Value Object
//!
//! Opaque bearer credential issued by the server. Never logged.

use kernel::error::app_error::{AppError, AppResult};

/// Non-empty opaque token
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token
    ///
    /// ## Returns
    /// * `Ok(AuthToken)` - At least one character
    /// * `Err(AppError)` - Empty string
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(AppError::bad_request("Auth token must not be empty"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Redacted: tokens end up in Debug output of sessions and events.
impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        let err = AuthToken::new("").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_new_keeps_value() {
        let token = AuthToken::new("697b84c9c82f9abc6a80359c9125d293").unwrap();
        assert_eq!(token.as_str(), "697b84c9c82f9abc6a80359c9125d293");
        assert_eq!(token.into_inner(), "697b84c9c82f9abc6a80359c9125d293");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AuthToken::new("secret-token").unwrap();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("secret-token"));
    }
}
