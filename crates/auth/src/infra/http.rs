//! reqwest Transport Implementation

use http::header::CACHE_CONTROL;
use serde_json::Value;

use crate::domain::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;

/// HTTP transport against a fixed base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Decode a response body
///
/// Empty bodies are `Null`. Error bodies that are not JSON are kept as
/// text so the caller can still show them.
fn decode_body(bytes: &[u8], success: bool) -> Result<Value, TransportError> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(_) if !success => Ok(Value::String(String::from_utf8_lossy(bytes).into_owned())),
        Err(e) => Err(TransportError::Decode(e.to_string())),
    }
}

impl Transport for HttpTransport {
    async fn request(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url(&request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers);

        if !request.cache {
            builder = builder.header(CACHE_CONTROL, "no-cache");
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let data = decode_body(&bytes, status.is_success())?;

        tracing::debug!(method = %request.method, url = %url, status = %status, "HTTP request completed");

        if !status.is_success() {
            return Err(TransportError::Status { status, body: data });
        }

        Ok(TransportResponse {
            status,
            headers,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn reply(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serve one connection with `response`; yields the request head, lower-cased
    async fn serve_once(response: String) -> (HttpTransport, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).to_lowercase()
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        (HttpTransport::with_client(client, base_url), server)
    }

    #[tokio::test]
    async fn test_request_disables_caching_and_decodes() {
        let (transport, server) = serve_once(reply("200 OK", r#"{"id":1}"#)).await;

        let response = tokio_test::assert_ok!(
            transport
                .request(TransportRequest::get("/users/me"))
                .await
        );
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.data, json!({"id": 1}));

        let head = server.await.unwrap();
        assert!(head.starts_with("get /users/me http/1.1"));
        assert!(head.contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn test_cacheable_request_has_no_cache_header() {
        let (transport, server) = serve_once(reply("200 OK", "")).await;

        let mut request = TransportRequest::get("/users/me");
        request.cache = true;
        let response = tokio_test::assert_ok!(transport.request(request).await);
        assert_eq!(response.data, Value::Null);

        let head = server.await.unwrap();
        assert!(!head.contains("cache-control"));
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let (transport, server) =
            serve_once(reply("401 Unauthorized", r#"{"error":"Unauthorized"}"#)).await;

        let err = tokio_test::assert_err!(
            transport
                .request(TransportRequest::post("/users/login", Some(json!({}))))
                .await
        );
        assert_eq!(
            err,
            TransportError::Status {
                status: StatusCode::UNAUTHORIZED,
                body: json!({"error": "Unauthorized"}),
            }
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let (transport, server) = serve_once(reply("200 OK", "<html>")).await;

        let err = tokio_test::assert_err!(
            transport
                .request(TransportRequest::get("/users/me"))
                .await
        );
        assert!(matches!(err, TransportError::Decode(_)));
        server.await.unwrap();
    }

    #[test]
    fn test_url_joining() {
        let transport = HttpTransport::new("http://localhost:8080/");
        assert_eq!(transport.url("/users/login"), "http://localhost:8080/users/login");
        assert_eq!(transport.url("users/me"), "http://localhost:8080/users/me");
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b"", true).unwrap(), Value::Null);
        assert_eq!(decode_body(br#"{"id":1}"#, true).unwrap(), json!({"id": 1}));
        assert_eq!(
            decode_body(b"Unauthorized", false).unwrap(),
            json!("Unauthorized")
        );
        assert!(matches!(
            decode_body(b"<html>", true),
            Err(TransportError::Decode(_))
        ));
    }
}
