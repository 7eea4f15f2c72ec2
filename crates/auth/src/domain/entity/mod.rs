//! Entity Module

pub mod current_user;
pub mod route;
pub mod session;

pub use current_user::CurrentUser;
pub use route::{Route, RouteParams};
pub use session::Session;
