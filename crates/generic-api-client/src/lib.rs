//! Reusable client for JSON REST APIs
//!
//! [`ApiClient`] owns a base URL, default query parameters and headers, and a
//! [`Transport`] performing the network I/O (reqwest or bitreq, selected by
//! feature, or any implementation injected for tests). It builds the URL,
//! merges parameters, form-encodes bodies and decodes JSON responses with
//! typed errors that keep the offending [`Response`].
//!
//! # Example
//!
//! ```no_run
//! use generic_api_client::{ApiClient, Error, RequestOptions};
//!
//! async fn example() -> Result<(), Error> {
//!     let mut client = ApiClient::new("https://postman-echo.com");
//!     client.add_default_query_parameter("api_key", "secret");
//!
//!     let data = client
//!         .post_data("post", RequestOptions::new().body_param("name", "Savannah"))
//!         .await?;
//!     assert_eq!(data["form"]["name"], "Savannah");
//!
//!     let response = client.get("status/404", RequestOptions::new()).await?;
//!     assert_eq!(response.status(), 404);
//!     Ok(())
//! }
//! ```

#[cfg(all(feature = "reqwest", feature = "bitreq"))]
compile_error!("Features \"reqwest\" and \"bitreq\" are mutually exclusive. Enable only one.");

mod backends;
mod client;
mod error;
pub mod json;
mod request;
mod response;
mod transport;

#[cfg(feature = "bitreq")]
pub use backends::BitreqTransport;
#[cfg(any(feature = "reqwest", feature = "bitreq"))]
pub use backends::DefaultTransport;
#[cfg(feature = "reqwest")]
pub use backends::{ReqwestTransport, ReqwestTransportBuilder};
pub use client::{ApiClient, ApiClientBuilder, QueryParameterProvider};
pub use error::{Error, HttpError};
pub use request::{Method, Parameters, Request, RequestOptions};
pub use response::{Headers, Response};
pub use transport::Transport;
