//! Application Layer
//!
//! Use cases and application services.

pub mod authorizer;
pub mod config;
pub mod fetch_user;
pub mod interceptor;
pub mod parser;
pub mod service;
pub mod session_store;
pub mod sign_in;
pub mod sign_out;

// Re-exports
pub use authorizer::{AUTHORIZE_ORIGIN, Authorizer};
pub use config::{AuthConfig, EndpointRoutes, RoutesPatch};
pub use fetch_user::FetchUserUseCase;
pub use interceptor::{InterceptedTransport, Interceptors, RequestInterceptor, TokenInterceptor};
pub use parser::{AuthDataParser, DefaultAuthDataParser, ParsedAuthData, sanitize_parsed_data};
pub use service::{AuthService, AuthServiceBuilder};
pub use session_store::SessionStore;
pub use sign_in::SignInUseCase;
pub use sign_out::SignOutUseCase;
