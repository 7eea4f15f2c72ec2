//! Presentation Layer
//!
//! Route guard, UI reactors and DTOs.

pub mod dto;
pub mod guard;
pub mod reactors;

pub use dto::{Credentials, InvalidAttribute, SessionStatus};
pub use guard::RouteGuard;
pub use reactors::{AuthClasses, ClassChange, LoginForm, LogoutTrigger};
