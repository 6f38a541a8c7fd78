//! bitreq-based transport

use std::sync::Arc;
use std::time::Duration;

use bitreq::RequestExt;

use crate::error::HttpError;
use crate::request::{Method, Request};
use crate::response::{Headers, Response};
use crate::transport::Transport;

/// Maximum number of pooled connections
const CONNECTION_POOL_SIZE: usize = 10;

/// bitreq-based transport
#[derive(Clone)]
pub struct BitreqTransport {
    client: Arc<bitreq::Client>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for BitreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for BitreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl BitreqTransport {
    /// Create a new transport with a pooled client
    pub fn new() -> Self {
        Self {
            client: Arc::new(bitreq::Client::new(CONNECTION_POOL_SIZE)),
            timeout: None,
        }
    }

    /// Set a timeout for each request
    ///
    /// bitreq counts whole seconds, so the timeout is rounded up and never
    /// drops below one second.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn prepare_request(&self, request: Request) -> bitreq::Request {
        let mut inner = match request.method {
            Method::Get => bitreq::get(request.url),
            Method::Post => bitreq::post(request.url),
            Method::Put => bitreq::put(request.url),
            Method::Patch => bitreq::patch(request.url),
            Method::Delete => bitreq::delete(request.url),
        };

        for (name, value) in request.headers {
            inner = inner.with_header(name, value);
        }

        if let Some(body) = request.body {
            inner = inner.with_body(body.into_bytes());
        }

        if let Some(timeout) = self.timeout {
            inner = inner.with_timeout(timeout_secs(timeout));
        }

        inner
    }
}

/// Whole seconds for bitreq, rounded up, at least one
fn timeout_secs(timeout: Duration) -> u64 {
    (timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0)).max(1)
}

#[async_trait::async_trait]
impl Transport for BitreqTransport {
    async fn send(&self, request: Request) -> Result<Response, HttpError> {
        let response = self
            .prepare_request(request)
            .send_async_with_client(&self.client)
            .await
            .map_err(HttpError::from)?;

        let headers: Headers = response
            .headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.clone()))
            .collect();

        let status =
            u16::try_from(response.status_code).map_err(|e| HttpError::Other(e.to_string()))?;

        Ok(Response::new(status, response.as_bytes().to_vec())
            .with_reason(response.reason_phrase.clone())
            .with_headers(headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_default() {
        let transport = BitreqTransport::default();
        let _ = format!("{:?}", transport);
    }

    #[test]
    fn test_timeout_rounds_up_to_whole_seconds() {
        assert_eq!(timeout_secs(Duration::ZERO), 1);
        assert_eq!(timeout_secs(Duration::from_millis(500)), 1);
        assert_eq!(timeout_secs(Duration::from_secs(1)), 1);
        assert_eq!(timeout_secs(Duration::from_millis(1900)), 2);
        assert_eq!(timeout_secs(Duration::from_secs(30)), 30);
    }

    #[tokio::test]
    async fn test_subsecond_timeout_still_sends() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let transport = BitreqTransport::new().with_timeout(Duration::from_millis(500));
        let response = transport
            .send(Request {
                method: Method::Get,
                url: format!("{}/ping", server.url()),
                headers: Vec::new(),
                body: None,
            })
            .await
            .expect("sub-second timeout should not fail the request");

        assert_eq!(response.status(), 200);

        mock.assert_async().await;
    }
}
