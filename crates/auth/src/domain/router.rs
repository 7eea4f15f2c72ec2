//! Router Trait
//!
//! What the route guard needs from the host's router: the current route,
//! programmatic navigation and a hook that runs before each transition.

use std::sync::Arc;

use crate::domain::entity::route::{Route, RouteParams};

/// A transition about to happen
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub to: Route,
    pub to_params: RouteParams,
    pub from: Route,
    pub from_params: RouteParams,
    prevented: bool,
}

impl Transition {
    pub fn new(to: Route, to_params: RouteParams, from: Route, from_params: RouteParams) -> Self {
        Self {
            to,
            to_params,
            from,
            from_params,
            prevented: false,
        }
    }

    /// Cancel the transition; the router stays where it is
    pub fn prevent_default(&mut self) {
        self.prevented = true;
    }

    pub fn is_prevented(&self) -> bool {
        self.prevented
    }
}

/// Runs before every transition and may cancel it
pub type TransitionHook = Arc<dyn Fn(&mut Transition) + Send + Sync>;

pub trait Router: Send + Sync {
    /// Route the router is currently on
    fn current(&self) -> Route;

    /// Navigate to a URL path
    fn go(&self, path: &str);

    fn on_transition_start(&self, hook: TransitionHook);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_default() {
        let mut transition = Transition::new(
            Route::new("users.me", "/me"),
            RouteParams::new(),
            Route::root(),
            RouteParams::new(),
        );
        assert!(!transition.is_prevented());
        transition.prevent_default();
        assert!(transition.is_prevented());
    }
}
