//! Current User Entity
//!
//! The authenticated user's profile as returned by the server. The
//! `authLevel` attribute is lifted out of the profile and stored as a typed,
//! immutable field; every other attribute is kept verbatim.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::value_object::auth_level::AuthLevel;

/// Profile key carrying the user's level
pub const AUTH_LEVEL_KEY: &str = "authLevel";

/// Authenticated user
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    profile: Map<String, Value>,
    auth_level: AuthLevel,
}

impl CurrentUser {
    /// Build from a server profile
    ///
    /// The level comes from `auth_level` when it is positive, otherwise
    /// from the profile's own `authLevel`, otherwise 0. Returns `None` when
    /// the profile is not a JSON object.
    pub(crate) fn from_profile(profile: Value, auth_level: Option<u64>) -> Option<Self> {
        let Value::Object(mut profile) = profile else {
            return None;
        };

        let embedded = profile.remove(AUTH_LEVEL_KEY);
        let auth_level = auth_level
            .filter(|level| *level > 0)
            .map(AuthLevel::new)
            .or_else(|| embedded.as_ref().and_then(AuthLevel::from_json))
            .unwrap_or_default();

        Some(Self {
            profile,
            auth_level,
        })
    }

    /// The profile's `authLevel` when it is set but unusable as a level
    ///
    /// Such a profile still builds, at level 0.
    pub fn malformed_level(profile: &Value) -> Option<&Value> {
        profile
            .get(AUTH_LEVEL_KEY)
            .filter(|level| !level.is_null() && AuthLevel::from_json(level).is_none())
    }

    pub fn auth_level(&self) -> AuthLevel {
        self.auth_level
    }

    /// Profile attribute by key (`authLevel` is not part of the profile)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.profile.get(key)
    }

    pub fn profile(&self) -> &Map<String, Value> {
        &self.profile
    }

    /// Profile with `authLevel` put back, as the server would send it
    pub fn to_value(&self) -> Value {
        let mut profile = self.profile.clone();
        profile.insert(AUTH_LEVEL_KEY.to_string(), Value::from(self.auth_level.value()));
        Value::Object(profile)
    }
}

impl Serialize for CurrentUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
