//! The seam between the client and the network.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{FetchError, RequestBuilder, Response};

/// Sends a fully built request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with an optional whole-request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let url = request.full_url();
        let mut outbound = self.client.get(url.as_str());

        for (key, value) in request.headers() {
            outbound = outbound.header(key.as_str(), value.as_str());
        }

        let response = outbound.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::trace!(%url, status, bytes = body.len(), "http response received");
        Ok(Response::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    async fn local_listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        (listener, base)
    }

    // === Success ===

    #[tokio::test]
    async fn test_send_reads_status_headers_and_body() {
        let (listener, base) = local_listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let body = br#"{"lectures":[]}"#;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            String::from_utf8_lossy(&buf[..n]).to_string()
        });

        let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
        let request = RequestBuilder::get(format!("{}/lectures", base))
            .query("search", "linear algebra")
            .header("X-Request-Id", "abc");
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.text(), r#"{"lectures":[]}"#);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /lectures?search=linear+algebra HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("x-request-id: abc"));
    }

    // === Failure mapping ===

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let (listener, base) = local_listener().await;
        drop(listener);

        let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
        let err = transport
            .send(RequestBuilder::get(format!("{}/lectures", base)))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_silent_server_is_timeout() {
        let (listener, base) = local_listener().await;
        let server = tokio::spawn(async move {
            // Accept and hold the connection without ever answering
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let transport = HttpTransport::new(Some(Duration::from_millis(100))).unwrap();
        let err = transport
            .send(RequestBuilder::get(format!("{}/lectures", base)))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Timeout);
        server.abort();
    }

    #[tokio::test]
    async fn test_unparseable_url_is_invalid_url() {
        let transport = HttpTransport::new(None).unwrap();
        let err = transport
            .send(RequestBuilder::get("not a url"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)), "got {:?}", err);
    }
}
