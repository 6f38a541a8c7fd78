//! HTTP transport trait

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::HttpError;
use crate::request::Request;
use crate::response::Response;

/// Capability performing the network I/O for an [`ApiClient`](crate::ApiClient)
///
/// Implementations must return every HTTP status code as a [`Response`] and
/// fail only when no response could be obtained (connectivity, timeout,
/// malformed response line). Timeouts and cancellation are the transport's
/// concern.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send a request and return the response
    async fn send(&self, request: Request) -> Result<Response, HttpError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: Request) -> Result<Response, HttpError> {
        (**self).send(request).await
    }
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, request: Request) -> Result<Response, HttpError> {
        (**self).send(request).await
    }
}
