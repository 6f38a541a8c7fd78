//! Error types

use serde_json::Value;
use thiserror::Error;

use crate::response::Response;

/// Transport-level failures
///
/// These never describe an HTTP status: every status code is a normal
/// [`Response`]. They surface only when no response could be obtained.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection error (refused, reset, DNS failure)
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Proxy error
    #[error("Proxy error: {0}")]
    Proxy(String),
    /// Client build error
    #[error("Client build error: {0}")]
    Build(String),
    /// Other error
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_builder() {
            HttpError::Build(err.to_string())
        } else if err.is_connect() {
            HttpError::Connection(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }
}

#[cfg(feature = "bitreq")]
impl From<bitreq::Error> for HttpError {
    fn from(err: bitreq::Error) -> Self {
        use bitreq::Error;
        use std::io;

        match err {
            Error::IoError(io_err) => {
                if io_err.kind() == io::ErrorKind::TimedOut {
                    HttpError::Timeout
                } else if io_err.kind() == io::ErrorKind::ConnectionRefused
                    || io_err.kind() == io::ErrorKind::ConnectionReset
                    || io_err.kind() == io::ErrorKind::ConnectionAborted
                    || io_err.kind() == io::ErrorKind::NotConnected
                {
                    HttpError::Connection(io_err.to_string())
                } else {
                    HttpError::Other(io_err.to_string())
                }
            }
            Error::AddressNotFound => HttpError::Connection(err.to_string()),
            _ => HttpError::Other(err.to_string()),
        }
    }
}

/// Errors returned by [`ApiClient`](crate::ApiClient) and the JSON parser
#[derive(Debug, Error)]
pub enum Error {
    /// The transport could not complete the request
    #[error(transparent)]
    Transport(#[from] HttpError),
    /// The response body is not valid JSON
    #[error("{message}")]
    MalformedResponse {
        /// Response whose body failed to decode
        response: Response,
        /// Decode diagnostic followed by the raw body
        message: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },
    /// The response decoded but its status code was not 200
    #[error("Response code {} received", .response.status())]
    Api {
        /// Response carrying the unexpected status
        response: Response,
        /// Decoded body of the response
        data: Value,
    },
    /// Body parameters could not be form encoded
    #[error("Form encoding error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

impl Error {
    /// Response attached to the error, if any
    ///
    /// Available for [`Error::Api`] and [`Error::MalformedResponse`] so the
    /// raw status, headers and body can be inspected after a failure.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Api { response, .. } | Error::MalformedResponse { response, .. } => {
                Some(response)
            }
            Error::Transport(_) | Error::Encode(_) => None,
        }
    }

    /// Status code of the attached response, if any
    pub fn status(&self) -> Option<u16> {
        self.response().map(Response::status)
    }
}
