//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Errors are `Clone` so they can travel
//! on the event bus as `*.error` payloads.

use http::StatusCode;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde_json::Value;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Failure of a call through the transport
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status
    #[error("Server responded {status}")]
    Status { status: StatusCode, body: Value },

    /// The request never produced a response
    #[error("Network error: {message}")]
    Network { kind: ErrorKind, message: String },

    /// A 2xx response whose body could not be decoded
    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Shorthand for a status error with an empty body
    pub fn status(status: StatusCode) -> Self {
        TransportError::Status {
            status,
            body: Value::Null,
        }
    }

    /// HTTP status, when the server answered
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Status { status, .. } => ErrorKind::from_status_code(status.as_u16())
                .unwrap_or(ErrorKind::InternalServerError),
            TransportError::Network { kind, .. } => *kind,
            TransportError::Decode(_) => ErrorKind::BadGateway,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return TransportError::status(status);
        }
        let app_err = AppError::from(err);
        TransportError::Network {
            kind: app_err.kind(),
            message: app_err.to_string(),
        }
    }
}

/// Auth-specific error variants
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Transport call failed; the session has been cleared
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Input rejected before any request was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Transport(err) => err.kind(),
            AuthError::InvalidInput(_) => ErrorKind::BadRequest,
        }
    }

    /// HTTP status of the failed call, if there was one
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            AuthError::Transport(err) => err.status_code(),
            AuthError::InvalidInput(_) => None,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self.kind() {
            ErrorKind::Unauthorized => err.with_action("Check your credentials and sign in again"),
            ErrorKind::Forbidden => err.with_action("Your account cannot access this resource"),
            kind if kind.is_server_error() => err.with_action("Try again later"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Transport(TransportError::Status { status, .. })
                if status.is_client_error() =>
            {
                tracing::info!(status = %status, "Auth request rejected");
            }
            AuthError::Transport(TransportError::Status { status, .. }) => {
                tracing::error!(status = %status, "Auth server error");
            }
            AuthError::Transport(err) => {
                tracing::warn!(error = %err, "Auth transport failure");
            }
            AuthError::InvalidInput(msg) => {
                tracing::warn!(message = %msg, "Auth input rejected");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}
