//! Value Object Module

pub mod auth_level;
pub mod auth_token;
pub mod route_requirement;

pub use auth_level::AuthLevel;
pub use auth_token::AuthToken;
pub use route_requirement::{MIN_AUTH_LEVEL_KEY, Requirement, RouteRequirement};
