//! Per-request options passed through to the underlying client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Method};

/// Caller-supplied request options.
///
/// Every field passes through to the dispatched request unchanged. The
/// connection pool is deliberately absent: requests always go through the
/// pool owned by the [`Service`](super::Service) that issues them.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use reqwest::Method;
/// use reqwest::header::{ACCEPT, HeaderValue};
/// use http_service::http::RequestOptions;
///
/// let options = RequestOptions::new()
///     .method(Method::DELETE)
///     .header(ACCEPT, HeaderValue::from_static("application/json"))
///     .timeout(Duration::from_secs(5));
/// assert_eq!(options.effective_method(), Method::DELETE);
/// ```
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// HTTP method. `GET` when unset.
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<Body>,
    /// Per-request timeout handed to the underlying client.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The method the request will be sent with.
    pub fn effective_method(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{ACCEPT, CONTENT_TYPE};

    use super::*;

    #[test]
    fn test_method_defaults_to_get() {
        assert_eq!(RequestOptions::default().effective_method(), Method::GET);
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = RequestOptions::new()
            .method(Method::PUT)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .body("hello")
            .timeout(Duration::from_millis(250));

        assert_eq!(options.effective_method(), Method::PUT);
        assert_eq!(options.headers[CONTENT_TYPE], "text/plain");
        assert_eq!(options.body.as_ref().and_then(|b| b.as_bytes()), Some(&b"hello"[..]));
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_headers_merge_over_existing() {
        let mut extra = HeaderMap::new();
        extra.insert(ACCEPT, HeaderValue::from_static("text/html"));

        let options = RequestOptions::new()
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .headers(extra);

        assert_eq!(options.headers.len(), 1);
        assert_eq!(options.headers[ACCEPT], "text/html");
    }
}
