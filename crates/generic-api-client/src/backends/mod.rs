//! HTTP transport backends

#[cfg(feature = "bitreq")]
pub mod bitreq_backend;

#[cfg(feature = "reqwest")]
pub mod reqwest_backend;

#[cfg(feature = "bitreq")]
pub use bitreq_backend::BitreqTransport;
#[cfg(feature = "reqwest")]
pub use reqwest_backend::{ReqwestTransport, ReqwestTransportBuilder};

/// Transport used by [`ApiClient::new`](crate::ApiClient::new)
#[cfg(feature = "bitreq")]
pub type DefaultTransport = BitreqTransport;

/// Transport used by [`ApiClient::new`](crate::ApiClient::new)
#[cfg(feature = "reqwest")]
pub type DefaultTransport = ReqwestTransport;
