//! Auth (Authentication) Client Module
//!
//! Client-side session management against a token-issuing auth server.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, events, transport and router traits
//! - `application/` - Session store, use cases and the `AuthService` facade
//! - `infra/` - reqwest transport, in-memory transport, in-process router
//! - `presentation/` - Route guard, UI reactors, DTOs
//!
//! ## Features
//! - Login / logout / fetch-current-user against configurable endpoints
//! - Pluggable parsing of auth data out of server responses
//! - Token attachment to outgoing requests through interceptors
//! - Level-based route authorization with a transition guard
//! - Session events on a broadcast bus
//!
//! ## Session Model
//! - A user is signed in iff both a profile and a non-empty token are held
//! - Any failed or invalid authentication signs the user out
//! - Every session change is published as an `update` event

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::service::{AuthService, AuthServiceBuilder};
pub use domain::event::AuthEvent;
pub use domain::transport::{Transport, TransportRequest, TransportResponse};
pub use error::{AuthError, AuthResult, TransportError};
pub use infra::{HttpTransport, MemoryBackend, MemoryRouter};
pub use presentation::guard::RouteGuard;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::domain::router::*;
    pub use crate::infra::router::MemoryRouter;
}

pub mod reactors {
    pub use crate::presentation::reactors::*;
}
