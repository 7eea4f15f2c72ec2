//! In-memory Transport
//!
//! Scripted stand-in for the auth server. Every request is recorded so
//! callers can inspect what was sent.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use http::{Method, StatusCode};
use serde_json::Value;

use crate::domain::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;

/// Produces the answer to a scripted request
pub type Responder =
    Arc<dyn Fn(&TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync>;

#[derive(Default)]
pub struct MemoryBackend {
    routes: RwLock<Vec<(Method, String, Responder)>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `method path`; a later script for the same route wins
    pub fn when<F>(&self, method: Method, path: impl Into<String>, responder: F) -> &Self
    where
        F: Fn(&TransportRequest) -> Result<TransportResponse, TransportError>
            + Send
            + Sync
            + 'static,
    {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((method, path.into(), Arc::new(responder)));
        self
    }

    /// Script a fixed answer; non-2xx statuses become errors
    pub fn respond(
        &self,
        method: Method,
        path: impl Into<String>,
        status: StatusCode,
        body: Value,
    ) -> &Self {
        self.when(method, path, move |_| {
            if status.is_success() {
                Ok(TransportResponse::new(status, body.clone()))
            } else {
                Err(TransportError::Status {
                    status,
                    body: body.clone(),
                })
            }
        })
    }

    /// Everything received so far, oldest first
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn responder_for(&self, request: &TransportRequest) -> Option<Responder> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(method, path, _)| *method == request.method && *path == request.path)
            .map(|(_, _, responder)| responder.clone())
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("requests", &self.requests().len())
            .finish_non_exhaustive()
    }
}

impl Transport for MemoryBackend {
    async fn request(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let responder = self.responder_for(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match responder {
            Some(responder) => responder(&request),
            None => {
                tracing::debug!(method = %request.method, path = %request.path, "No scripted route");
                Err(TransportError::status(StatusCode::NOT_FOUND))
            }
        }
    }
}
