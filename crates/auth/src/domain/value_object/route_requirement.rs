//! Route Requirement
//!
//! Minimum auth level a navigational destination declares. A level can be
//! declared inside the route's `data` map or directly on the route; the
//! `data` entry wins whenever the key is present there.

use serde_json::{Map, Value};

/// Key under which a route declares its minimum level
pub const MIN_AUTH_LEVEL_KEY: &str = "minAuthLevel";

/// Access requirement of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone may enter
    Open,
    /// Requires an authenticated user with at least this level (always >= 1)
    MinLevel(u64),
    /// The value handed over was not a route at all
    Unrecognized,
}

impl Requirement {
    /// Interpret a declared level
    ///
    /// Missing, non-numeric or < 1 declarations mean the route is open.
    /// Fractional levels are rounded up.
    pub fn from_declared(declared: Option<&Value>) -> Self {
        match declared.and_then(Value::as_f64) {
            Some(level) if level >= 1.0 => Requirement::MinLevel(level.ceil() as u64),
            _ => Requirement::Open,
        }
    }

    /// Read the requirement of a route given as a JSON object
    pub fn from_route_object(route: &Map<String, Value>) -> Self {
        let nested = route
            .get("data")
            .and_then(Value::as_object)
            .and_then(|data| data.get(MIN_AUTH_LEVEL_KEY));
        Self::from_declared(nested.or_else(|| route.get(MIN_AUTH_LEVEL_KEY)))
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Requirement::Open)
    }
}

/// Anything that can be asked for its access requirement
pub trait RouteRequirement {
    fn requirement(&self) -> Requirement;
}

impl RouteRequirement for Requirement {
    fn requirement(&self) -> Requirement {
        *self
    }
}

/// Raw route objects as handed over by a host router
impl RouteRequirement for Value {
    fn requirement(&self) -> Requirement {
        match self.as_object() {
            Some(route) => Requirement::from_route_object(route),
            None => Requirement::Unrecognized,
        }
    }
}

impl<R: RouteRequirement + ?Sized> RouteRequirement for &R {
    fn requirement(&self) -> Requirement {
        (**self).requirement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declared_levels() {
        assert_eq!(Requirement::from_declared(None), Requirement::Open);
        assert_eq!(Requirement::from_declared(Some(&json!(0))), Requirement::Open);
        assert_eq!(Requirement::from_declared(Some(&json!(-3))), Requirement::Open);
        assert_eq!(Requirement::from_declared(Some(&json!("100"))), Requirement::Open);
        assert_eq!(Requirement::from_declared(Some(&json!(1))), Requirement::MinLevel(1));
        assert_eq!(Requirement::from_declared(Some(&json!(1.2))), Requirement::MinLevel(2));
    }

    #[test]
    fn test_data_entry_takes_precedence() {
        let route = json!({
            "name": "admin",
            "minAuthLevel": 1,
            "data": { "minAuthLevel": 500 }
        });
        assert_eq!(route.requirement(), Requirement::MinLevel(500));
    }

    #[test]
    fn test_data_entry_present_but_not_numeric_opens_route() {
        let route = json!({
            "minAuthLevel": 10,
            "data": { "minAuthLevel": "high" }
        });
        assert_eq!(route.requirement(), Requirement::Open);
    }

    #[test]
    fn test_direct_entry_used_without_data() {
        let route = json!({ "name": "me", "minAuthLevel": 100 });
        assert_eq!(route.requirement(), Requirement::MinLevel(100));
    }

    #[test]
    fn test_non_object_is_unrecognized() {
        assert_eq!(json!("users.me").requirement(), Requirement::Unrecognized);
        assert_eq!(json!([1, 2]).requirement(), Requirement::Unrecognized);
        assert_eq!(Value::Null.requirement(), Requirement::Unrecognized);
    }
}
