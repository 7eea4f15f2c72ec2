//! Domain Layer
//!
//! Contains entities, value objects, events and the transport and router traits.

pub mod authorize;
pub mod entity;
pub mod event;
pub mod router;
pub mod transport;
pub mod value_object;

// Re-exports
pub use authorize::authorize;
pub use entity::{CurrentUser, Route, RouteParams, Session};
pub use event::{AuthEvent, TransitionRejection};
pub use router::{Router, Transition, TransitionHook};
pub use transport::{LocalTransport, Transport, TransportRequest, TransportResponse};
