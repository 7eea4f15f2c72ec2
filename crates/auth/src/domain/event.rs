//! Auth Events
//!
//! Everything the session layer announces. Hosts subscribe through the
//! service's event bus.

use serde::Serialize;

use crate::domain::entity::{current_user::CurrentUser, route::Route, route::RouteParams};
use crate::domain::transport::TransportResponse;
use crate::error::AuthError;

/// Payload of a denied route transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRejection {
    pub to: Route,
    pub to_params: RouteParams,
    pub from: Route,
    pub from_params: RouteParams,
    /// 401 when nobody is signed in, 403 otherwise
    pub status_code: u16,
    pub status_text: &'static str,
    pub is_user_logged_in: bool,
    pub publisher: &'static str,
}

#[derive(Debug, Clone)]
pub enum AuthEvent {
    LoginSuccess(TransportResponse),
    LoginError(AuthError),
    LogoutSuccess(TransportResponse),
    LogoutError(AuthError),
    FetchSuccess(TransportResponse),
    FetchError(AuthError),
    /// Session replaced or cleared
    Update {
        user: Option<CurrentUser>,
        is_authenticated: bool,
    },
    TransitionError(TransitionRejection),
}

impl AuthEvent {
    /// Name under which the event is announced
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::LoginSuccess(_) => "login.success",
            AuthEvent::LoginError(_) => "login.error",
            AuthEvent::LogoutSuccess(_) => "logout.success",
            AuthEvent::LogoutError(_) => "logout.error",
            AuthEvent::FetchSuccess(_) => "fetch.success",
            AuthEvent::FetchError(_) => "fetch.error",
            AuthEvent::Update { .. } => "update",
            AuthEvent::TransitionError(_) => "transition.error",
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, AuthEvent::Update { .. })
    }
}
