//! HTTP request types

use std::collections::BTreeMap;
use std::fmt;

/// Key/value parameters for query strings, form bodies and headers
pub type Parameters = BTreeMap<String, String>;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call inputs of [`ApiClient::request`](crate::ApiClient::request)
///
/// Body parameters are ignored for GET requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Form parameters sent in the request body
    pub body: Parameters,
    /// Query parameters, overriding same-keyed defaults
    pub query: Parameters,
    /// Headers, overriding same-named defaults
    pub headers: Parameters,
}

impl RequestOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body parameter
    pub fn body_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace all body parameters
    pub fn with_body(mut self, body: Parameters) -> Self {
        self.body = body;
        self
    }

    /// Replace all query parameters
    pub fn with_query(mut self, query: Parameters) -> Self {
        self.query = query;
        self
    }

    /// Replace all headers
    pub fn with_headers(mut self, headers: Parameters) -> Self {
        self.headers = headers;
        self
    }
}

/// Fully built HTTP request handed to a [`Transport`](crate::Transport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the query string
    pub url: String,
    /// Header names and values, names lowercased
    pub headers: Vec<(String, String)>,
    /// Body, absent for GET requests
    pub body: Option<String>,
}

impl Request {
    /// First header value for `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
