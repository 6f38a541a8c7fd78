//! API client

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

#[cfg(any(feature = "reqwest", feature = "bitreq"))]
use crate::backends::DefaultTransport;
use crate::error::Error;
use crate::json;
use crate::request::{Method, Parameters, Request, RequestOptions};
use crate::response::Response;
use crate::transport::Transport;

const CONTENT_TYPE: &str = "content-type";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Computes the effective default query parameters for each request
///
/// Receives the static defaults and returns the parameters to merge, e.g. the
/// defaults plus a fresh timestamp. Must not have side effects a concurrent
/// caller could observe.
pub type QueryParameterProvider = Arc<dyn Fn(&Parameters) -> Parameters + Send + Sync>;

/// Client for a JSON REST API rooted at a base URL
///
/// `last_response` is shared by all callers of one instance: when requests
/// run concurrently the last one to complete wins.
pub struct ApiClient<T> {
    base_url: String,
    default_query_parameters: Parameters,
    query_parameter_provider: Option<QueryParameterProvider>,
    default_headers: Parameters,
    transport: T,
    last_response: RwLock<Option<Response>>,
}

impl<T: fmt::Debug> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("default_query_parameters", &self.default_query_parameters)
            .field(
                "query_parameter_provider",
                &self.query_parameter_provider.is_some(),
            )
            .field("default_headers", &self.default_headers)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Trim every trailing slash and append exactly one
fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

/// URL up to the query string, which may carry credentials
fn without_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

#[cfg(any(feature = "reqwest", feature = "bitreq"))]
impl ApiClient<DefaultTransport> {
    /// Create a client using the default transport
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, DefaultTransport::default())
    }

    /// Create a client builder using the default transport
    pub fn builder(base_url: &str) -> ApiClientBuilder<DefaultTransport> {
        ApiClientBuilder::new(base_url, DefaultTransport::default())
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client sending requests through `transport`
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            default_query_parameters: Parameters::new(),
            query_parameter_provider: None,
            default_headers: Parameters::new(),
            transport,
            last_response: RwLock::new(None),
        }
    }

    /// Base URL, always ending with exactly one `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transport used to send requests
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Query parameters merged into every request
    ///
    /// Runs the query parameter provider, if one is set, on every call.
    pub fn default_query_parameters(&self) -> Parameters {
        match &self.query_parameter_provider {
            Some(provider) => provider(&self.default_query_parameters),
            None => self.default_query_parameters.clone(),
        }
    }

    /// Add or overwrite a default query parameter
    pub fn add_default_query_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.default_query_parameters.insert(key.into(), value.into());
    }

    /// Remove a default query parameter
    pub fn remove_default_query_parameter(&mut self, key: &str) {
        self.default_query_parameters.remove(key);
    }

    /// Compute default query parameters per request with `provider`
    pub fn set_query_parameter_provider<F>(&mut self, provider: F)
    where
        F: Fn(&Parameters) -> Parameters + Send + Sync + 'static,
    {
        self.query_parameter_provider = Some(Arc::new(provider));
    }

    /// Go back to the static default query parameters
    pub fn clear_query_parameter_provider(&mut self) {
        self.query_parameter_provider = None;
    }

    /// Headers merged into every request, names lowercased
    pub fn default_headers(&self) -> &Parameters {
        &self.default_headers
    }

    /// Add or overwrite a default header
    pub fn add_default_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.default_headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Remove a default header
    pub fn remove_default_header(&mut self, name: &str) {
        self.default_headers.remove(&name.to_ascii_lowercase());
    }

    /// Build the request [`ApiClient::request`] would send
    ///
    /// The endpoint may start with a slash or not. Caller query parameters
    /// and headers win over defaults. GET requests never carry a body; every
    /// other method gets a form-encoded body and a forced form content type.
    /// An empty query adds nothing to the URL.
    pub fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Request, Error> {
        let mut url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );

        let mut query = self.default_query_parameters();
        query.extend(options.query);

        let mut headers = self.default_headers.clone();
        for (name, value) in options.headers {
            headers.insert(name.to_ascii_lowercase(), value);
        }

        let body = match method {
            Method::Get => None,
            _ => {
                headers.insert(CONTENT_TYPE.to_string(), FORM_URLENCODED.to_string());
                Some(serde_urlencoded::to_string(&options.body)?)
            }
        };

        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&serde_urlencoded::to_string(&query)?);
        }

        Ok(Request {
            method,
            url,
            headers: headers.into_iter().collect(),
            body,
        })
    }

    /// Send a request and return the response whatever its status
    ///
    /// Only transport failures are errors. The response is recorded as the
    /// last response before it is returned.
    #[instrument(
        skip(self, endpoint, options),
        fields(endpoint = without_query(endpoint))
    )]
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Response, Error> {
        let request = self.build_request(method, endpoint, options)?;
        tracing::debug!("{} {}", request.method, without_query(&request.url));

        let response = self.transport.send(request).await?;
        tracing::debug!("Response code {} received", response.status());

        if let Ok(mut last_response) = self.last_response.write() {
            *last_response = Some(response.clone());
        }

        Ok(response)
    }

    /// Send a request and decode its JSON body
    ///
    /// A body that is not JSON is reported before the status is looked at.
    /// Any status other than 200 is an [`Error::Api`].
    pub async fn request_data(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, Error> {
        let response = self.request(method, endpoint, options).await?;
        let data = self.parse_response(&response)?;

        if response.status() != 200 {
            return Err(Error::Api { response, data });
        }

        Ok(data)
    }

    /// Same as [`ApiClient::request_data`] but decodes a 200 body into `R`
    pub async fn request_data_as<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R, Error> {
        let response = self.request(method, endpoint, options).await?;

        if response.status() != 200 {
            let data = self.parse_response(&response)?;
            return Err(Error::Api { response, data });
        }

        json::parse_json_response_as(&response)
    }

    /// GET request; body parameters are ignored
    pub async fn get(&self, endpoint: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(Method::Get, endpoint, options).await
    }

    /// GET request returning the decoded body
    pub async fn get_data(&self, endpoint: &str, options: RequestOptions) -> Result<Value, Error> {
        self.request_data(Method::Get, endpoint, options).await
    }

    /// POST request
    pub async fn post(&self, endpoint: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(Method::Post, endpoint, options).await
    }

    /// POST request returning the decoded body
    pub async fn post_data(&self, endpoint: &str, options: RequestOptions) -> Result<Value, Error> {
        self.request_data(Method::Post, endpoint, options).await
    }

    /// PUT request
    pub async fn put(&self, endpoint: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(Method::Put, endpoint, options).await
    }

    /// PUT request returning the decoded body
    pub async fn put_data(&self, endpoint: &str, options: RequestOptions) -> Result<Value, Error> {
        self.request_data(Method::Put, endpoint, options).await
    }

    /// PATCH request
    pub async fn patch(&self, endpoint: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(Method::Patch, endpoint, options).await
    }

    /// PATCH request returning the decoded body
    pub async fn patch_data(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, Error> {
        self.request_data(Method::Patch, endpoint, options).await
    }

    /// DELETE request
    pub async fn delete(&self, endpoint: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(Method::Delete, endpoint, options).await
    }

    /// DELETE request returning the decoded body
    pub async fn delete_data(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, Error> {
        self.request_data(Method::Delete, endpoint, options).await
    }

    /// Decode the JSON body of a response
    pub fn parse_response(&self, response: &Response) -> Result<Value, Error> {
        json::parse_json_response(response)
    }

    /// Most recent response, `None` before the first request
    pub fn last_response(&self) -> Option<Response> {
        self.last_response
            .read()
            .ok()
            .and_then(|last_response| last_response.clone())
    }
}

/// Builder for an [`ApiClient`] with preset defaults
pub struct ApiClientBuilder<T> {
    base_url: String,
    transport: T,
    default_query_parameters: Parameters,
    query_parameter_provider: Option<QueryParameterProvider>,
    default_headers: Parameters,
}

impl<T: fmt::Debug> fmt::Debug for ApiClientBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .field("default_query_parameters", &self.default_query_parameters)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ApiClientBuilder<T> {
    /// Create a builder for `base_url` using `transport`
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.to_string(),
            transport,
            default_query_parameters: Parameters::new(),
            query_parameter_provider: None,
            default_headers: Parameters::new(),
        }
    }

    /// Replace the transport
    pub fn transport<U: Transport>(self, transport: U) -> ApiClientBuilder<U> {
        ApiClientBuilder {
            base_url: self.base_url,
            transport,
            default_query_parameters: self.default_query_parameters,
            query_parameter_provider: self.query_parameter_provider,
            default_headers: self.default_headers,
        }
    }

    /// Add a default query parameter
    pub fn default_query_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_query_parameters.insert(key.into(), value.into());
        self
    }

    /// Add a default header
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.default_headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Compute default query parameters per request
    pub fn query_parameter_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Parameters) -> Parameters + Send + Sync + 'static,
    {
        self.query_parameter_provider = Some(Arc::new(provider));
        self
    }

    /// Build the client
    pub fn build(self) -> ApiClient<T> {
        let mut client = ApiClient::with_transport(&self.base_url, self.transport);
        client.default_query_parameters = self.default_query_parameters;
        client.query_parameter_provider = self.query_parameter_provider;
        client.default_headers = self.default_headers;
        client
    }
}
