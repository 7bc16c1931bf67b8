//! HTTP request/response types and client trait.

use super::HttpError;

/// An HTTP GET request.
///
/// Uses standard `http` crate types for headers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
}

impl HttpRequest {
    /// Creates a GET request to the given URL with no headers.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self {
            url,
            headers: http::HeaderMap::new(),
        }
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// An HTTP response with a fully buffered body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Trait for making HTTP GET requests.
///
/// Abstracts the HTTP library so the update check can be tested with a
/// mock client.
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    fn get(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
