//! Route Entity
//!
//! A navigational destination known to the host router.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::value_object::route_requirement::{
    MIN_AUTH_LEVEL_KEY, Requirement, RouteRequirement,
};

/// Parameters of a transition
pub type RouteParams = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Empty for the implicit root state before the first navigation
    pub name: String,
    pub url: String,
    /// Declared minimum level; kept loose so hosts can declare anything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_auth_level: Option<Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Route {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// The unnamed state a router sits in before its first transition
    pub fn root() -> Self {
        Self::new("", "^")
    }

    pub fn with_min_auth_level(mut self, level: impl Into<Value>) -> Self {
        self.min_auth_level = Some(level.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

impl RouteRequirement for Route {
    fn requirement(&self) -> Requirement {
        let declared = self
            .data
            .get(MIN_AUTH_LEVEL_KEY)
            .or(self.min_auth_level.as_ref());
        Requirement::from_declared(declared)
    }
}
