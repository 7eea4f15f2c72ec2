//! In-process Router
//!
//! Minimal state machine router: a table of named routes, the current
//! route and the hooks run before each transition.

use std::sync::{PoisonError, RwLock};

use crate::domain::entity::route::{Route, RouteParams};
use crate::domain::router::{Router, Transition, TransitionHook};

pub struct MemoryRouter {
    states: RwLock<Vec<Route>>,
    current: RwLock<(Route, RouteParams)>,
    hooks: RwLock<Vec<TransitionHook>>,
}

impl MemoryRouter {
    /// A router sitting on the unnamed root state
    pub fn new() -> Self {
        Self {
            states: RwLock::new(Vec::new()),
            current: RwLock::new((Route::root(), RouteParams::new())),
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Register a route; a route with the same name is replaced
    pub fn state(self, route: Route) -> Self {
        self.register(route);
        self
    }

    pub fn register(&self, route: Route) {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        states.retain(|existing| existing.name != route.name);
        states.push(route);
    }

    pub fn find(&self, name: &str) -> Option<Route> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|route| route.name == name)
            .cloned()
    }

    fn find_by_url(&self, url: &str) -> Option<Route> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|route| route.url == url)
            .cloned()
    }

    pub fn current_params(&self) -> RouteParams {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .1
            .clone()
    }

    /// Move to the route called `name`
    ///
    /// Every hook sees the transition; any of them may cancel it. Returns
    /// whether the router moved.
    pub fn transition_to(&self, name: &str, params: RouteParams) -> bool {
        let Some(to) = self.find(name) else {
            tracing::warn!(route = %name, "Unknown route");
            return false;
        };

        let (from, from_params) = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let mut transition = Transition::new(to, params, from, from_params);

        // Hooks may navigate or register hooks themselves.
        let hooks = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for hook in hooks {
            hook(&mut transition);
        }

        if transition.is_prevented() {
            tracing::debug!(route = %name, "Transition prevented");
            return false;
        }

        tracing::debug!(from = %transition.from.name, to = %name, "Transition succeeded");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) =
            (transition.to, transition.to_params);
        true
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRouter")
            .field("current", &self.current().name)
            .finish_non_exhaustive()
    }
}

impl Router for MemoryRouter {
    fn current(&self) -> Route {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .0
            .clone()
    }

    fn go(&self, path: &str) {
        match self.find_by_url(path) {
            Some(route) => {
                self.transition_to(&route.name, RouteParams::new());
            }
            None => tracing::warn!(path = %path, "No route for path"),
        }
    }

    fn on_transition_start(&self, hook: TransitionHook) {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }
}
