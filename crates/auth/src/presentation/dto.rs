//! DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entity::current_user::CurrentUser;

// ============================================================================
// Sign In
// ============================================================================

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub remember_me: bool,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember_me: false,
        }
    }
}

/// Why a login form refused to submit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidAttribute {
    pub attr_name: &'static str,
    pub attr_value: Value,
}

impl std::fmt::Display for InvalidAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.attr_name, self.attr_value)
    }
}

// ============================================================================
// Session Status
// ============================================================================

/// Session summary for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_user_logged_in: bool,
    pub user: Option<CurrentUser>,
    pub auth_level: u64,
}

impl SessionStatus {
    pub fn from_user(user: Option<CurrentUser>) -> Self {
        Self {
            is_user_logged_in: user.is_some(),
            auth_level: user.as_ref().map_or(0, |u| u.auth_level().value()),
            user,
        }
    }
}
