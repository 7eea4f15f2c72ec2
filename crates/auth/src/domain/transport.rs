//! Transport Trait
//!
//! Interface for the HTTP client used to talk to the auth server.
//! Implementations live in the infrastructure layer.

use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::error::TransportError;

/// Outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Path relative to the server's base URL
    pub path: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    /// When false, intermediaries must not serve a cached response
    pub cache: bool,
}

impl TransportRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            cache: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            body,
            ..Self::new(Method::POST, path)
        }
    }
}

/// Successful (2xx) response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Decoded JSON body; `Null` when the body was empty
    pub data: Value,
}

impl TransportResponse {
    pub fn new(status: StatusCode, data: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            data,
        }
    }

    pub fn ok(data: Value) -> Self {
        Self::new(StatusCode::OK, data)
    }
}

/// HTTP transport trait
///
/// Non-2xx responses come back as `TransportError::Status`.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    async fn request(&self, request: TransportRequest)
    -> Result<TransportResponse, TransportError>;
}
