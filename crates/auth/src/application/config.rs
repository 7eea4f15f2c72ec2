//! Application Configuration
//!
//! Configuration for the Auth application layer.

use http::HeaderName;
use serde::Deserialize;

/// Header carrying the token when none is configured
pub const DEFAULT_TOKEN_HEADER: &str = "x-auth-token";

/// Server endpoints used by login, logout and fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRoutes {
    pub login: String,
    pub logout: String,
    pub fetch: String,
}

impl Default for EndpointRoutes {
    fn default() -> Self {
        Self {
            login: "/users/login".to_string(),
            logout: "/users/logout".to_string(),
            fetch: "/users/me".to_string(),
        }
    }
}

/// Partial override of [`EndpointRoutes`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoutesPatch {
    pub login: Option<String>,
    pub logout: Option<String>,
    pub fetch: Option<String>,
}

impl RoutesPatch {
    pub fn login(mut self, path: impl Into<String>) -> Self {
        self.login = Some(path.into());
        self
    }

    pub fn logout(mut self, path: impl Into<String>) -> Self {
        self.logout = Some(path.into());
        self
    }

    pub fn fetch(mut self, path: impl Into<String>) -> Self {
        self.fetch = Some(path.into());
        self
    }
}

impl EndpointRoutes {
    /// Apply the keys present in `patch`; the others keep their value
    pub fn merge(&mut self, patch: RoutesPatch) {
        if let Some(login) = patch.login {
            self.login = login;
        }
        if let Some(logout) = patch.logout {
            self.logout = logout;
        }
        if let Some(fetch) = patch.fetch {
            self.fetch = fetch;
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Server endpoints
    pub routes: EndpointRoutes,
    /// Header used by token attachment when no name is given
    pub token_header: HeaderName,
    /// Where the route guard sends users it turns away
    pub redirect_path: String,
    /// Events buffered per subscriber before it starts lagging
    pub event_capacity: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            routes: EndpointRoutes::default(),
            token_header: HeaderName::from_static(DEFAULT_TOKEN_HEADER),
            redirect_path: "/".to_string(),
            event_capacity: platform::bus::DEFAULT_CAPACITY,
        }
    }
}

impl AuthConfig {
    /// Build from `AUTH_*` environment variables, defaulting what is unset
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    ///
    /// Invalid values are logged and replaced by their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.routes.merge(RoutesPatch {
            login: lookup("AUTH_LOGIN_PATH"),
            logout: lookup("AUTH_LOGOUT_PATH"),
            fetch: lookup("AUTH_FETCH_PATH"),
        });

        if let Some(raw) = lookup("AUTH_TOKEN_HEADER") {
            match platform::header::parse_header_name(&raw) {
                Ok(name) => config.token_header = name,
                Err(e) => tracing::warn!(error = %e, "Ignoring AUTH_TOKEN_HEADER"),
            }
        }

        if let Some(path) = lookup("AUTH_REDIRECT_PATH") {
            config.redirect_path = path;
        }

        if let Some(raw) = lookup("AUTH_EVENT_CAPACITY") {
            match raw.parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.event_capacity = capacity,
                _ => tracing::warn!(value = %raw, "Ignoring AUTH_EVENT_CAPACITY"),
            }
        }

        config
    }

    pub fn with_routes(mut self, patch: RoutesPatch) -> Self {
        self.routes.merge(patch);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.routes.login, "/users/login");
        assert_eq!(config.routes.logout, "/users/logout");
        assert_eq!(config.routes.fetch, "/users/me");
        assert_eq!(config.token_header.as_str(), "x-auth-token");
        assert_eq!(config.redirect_path, "/");
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_partial_patch_keeps_other_routes() {
        let config = AuthConfig::default().with_routes(RoutesPatch::default().login("/api/login"));
        assert_eq!(config.routes.login, "/api/login");
        assert_eq!(config.routes.logout, "/users/logout");
        assert_eq!(config.routes.fetch, "/users/me");
    }

    #[test]
    fn test_patch_deserializes_from_json() {
        let patch: RoutesPatch = serde_json::from_str(r#"{"fetch": "/session"}"#).unwrap();
        assert_eq!(patch, RoutesPatch::default().fetch("/session"));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("AUTH_LOGOUT_PATH", "/api/logout"),
            ("AUTH_TOKEN_HEADER", "X-Session"),
            ("AUTH_EVENT_CAPACITY", "16"),
        ]);
        let config = AuthConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.routes.login, "/users/login");
        assert_eq!(config.routes.logout, "/api/logout");
        assert_eq!(config.token_header.as_str(), "x-session");
        assert_eq!(config.event_capacity, 16);
    }

    #[test]
    fn test_from_lookup_ignores_invalid_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("AUTH_TOKEN_HEADER", "not a header"),
            ("AUTH_EVENT_CAPACITY", "zero"),
        ]);
        let config = AuthConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.token_header.as_str(), DEFAULT_TOKEN_HEADER);
        assert_eq!(config.event_capacity, 64);
    }
}
