//! The [`Service`] entry point and the [`ResponseHandle`] it returns.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use log::info;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Request, Response};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::config::ServiceConfig;

use super::error::{ServiceError, ServiceResult};
use super::options::RequestOptions;
use super::pool::{ConnectionPool, Transport};
use super::query::{QueryData, attach_query_data};

pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A generic HTTP service with a managed keep-alive connection pool.
///
/// Every request path is resolved against the root URL given at
/// construction and sent through the service's own pool. Responses are
/// handed back untouched: status codes are not interpreted and bodies are
/// not parsed.
///
/// `Service` is `Send + Sync`; requests issued concurrently from one
/// instance share its pool and may complete in any order.
///
/// # Example
///
/// ```rust,no_run
/// use http_service::http::{QueryData, Service};
///
/// # async fn example() -> Result<(), http_service::http::ServiceError> {
/// let service = Service::new("https://api.example.com")?;
///
/// let response = service
///     .post_json("/users", &QueryData::new(), &serde_json::json!({ "name": "a" }))?
///     .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Service {
    root_url: String,
    pool: ConnectionPool,
}

impl Service {
    /// Creates a service for `root_url`, which has to include the scheme.
    ///
    /// The URL is not validated here; a malformed root only fails once a
    /// request path is resolved against it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::PoolCreation`] if the connection pool cannot
    /// be built.
    pub fn new(root_url: impl Into<String>) -> ServiceResult<Self> {
        Self::with_user_agent(root_url, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(root_url: impl Into<String>, user_agent: &str) -> ServiceResult<Self> {
        let root_url = root_url.into();
        let pool = ConnectionPool::new(Transport::for_root_url(&root_url), user_agent)?;
        Ok(Self { root_url, pool })
    }

    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        Self::with_user_agent(config.root_url.clone(), &config.user_agent)
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn transport(&self) -> Transport {
        self.pool.transport()
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Prepares a request to `path` with `query_data` appended.
    ///
    /// The returned handle sends the request when awaited. Method defaults
    /// to `GET`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UrlError`] if the root URL or path does not resolve
    /// - [`ServiceError::UnsupportedProtocol`] if the resolved URL's scheme
    ///   does not match the pool's transport
    /// - [`ServiceError::InvalidRequest`] if the client rejects the request
    pub fn request(
        &self,
        path: &str,
        query_data: &QueryData,
        options: RequestOptions,
    ) -> ServiceResult<ResponseHandle> {
        let path_with_data = attach_query_data(path, query_data);
        let url = self.resolve(&path_with_data)?;
        let method = options.effective_method();

        info!(method:% = method, url:% = url; "Outgoing request");

        self.pool.prepare(url, options)
    }

    /// Sends `payload` as a JSON `POST` body.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::JsonError`] before anything is sent if the
    /// payload cannot be serialized, plus every error of
    /// [`request`](Self::request).
    pub fn post_json<T>(&self, path: &str, query_data: &QueryData, payload: &T) -> ServiceResult<ResponseHandle>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_string(payload)?;
        let options = RequestOptions::new()
            .method(Method::POST)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .body(body);

        self.request(path, query_data, options)
    }

    /// Sends `payload` as a form-urlencoded `POST` body.
    pub fn post_form(&self, path: &str, query_data: &QueryData, payload: &QueryData) -> ServiceResult<ResponseHandle> {
        let options = RequestOptions::new()
            .method(Method::POST)
            .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
            .body(payload.encode());

        self.request(path, query_data, options)
    }

    fn resolve(&self, path: &str) -> ServiceResult<Url> {
        Ok(Url::parse(&self.root_url)?.join(path)?)
    }
}

/// A prepared request bound to the pool of the service that issued it.
///
/// Nothing is sent until the handle is awaited. The output is the raw
/// [`Response`]; transport failures surface as
/// [`ServiceError::RequestFailed`].
#[derive(Debug)]
pub struct ResponseHandle {
    pool_id: Uuid,
    client: Client,
    request: Request,
}

impl ResponseHandle {
    pub(crate) fn new(pool_id: Uuid, client: Client, request: Request) -> Self {
        Self {
            pool_id,
            client,
            request,
        }
    }

    /// Id of the [`ConnectionPool`] this request is sent through.
    pub fn pool_id(&self) -> Uuid {
        self.pool_id
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn url(&self) -> &Url {
        self.request.url()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// The request body, if it is held in memory.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.request.body().and_then(|body| body.as_bytes())
    }

    /// Sends the request and waits for the response head.
    pub async fn send(self) -> ServiceResult<Response> {
        Ok(self.client.execute(self.request).await?)
    }
}

impl IntoFuture for ResponseHandle {
    type Output = ServiceResult<Response>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::header::ACCEPT;
    use serde_json::json;

    use super::*;

    fn service() -> Service {
        Service::new("https://api.example.com").unwrap()
    }

    #[test]
    fn test_transport_follows_root_url() {
        assert_eq!(service().transport(), Transport::Encrypted);
        assert_eq!(Service::new("http://api.example.com").unwrap().transport(), Transport::Plain);
        assert_eq!(Service::new("not a url").unwrap().transport(), Transport::Plain);
    }

    #[test]
    fn test_malformed_root_fails_at_request_time() {
        let service = Service::new("not a url").unwrap();
        let err = service.request("/users", &QueryData::new(), RequestOptions::default()).unwrap_err();
        assert!(matches!(err, ServiceError::UrlError(_)));
    }

    #[test]
    fn test_malformed_path_fails_at_request_time() {
        let err = service()
            .request("http://[::1", &QueryData::new(), RequestOptions::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::UrlError(url::ParseError::InvalidIpv6Address)));

        let err = service()
            .post_json("http://[::1", &QueryData::new(), &json!({ "name": "a" }))
            .unwrap_err();
        assert!(matches!(err, ServiceError::UrlError(_)));
    }

    #[test]
    fn test_request_defaults_to_get_with_query() {
        let query = QueryData::from([("q", "a b")]);
        let handle = service().request("/search", &query, RequestOptions::default()).unwrap();

        assert_eq!(handle.method(), &Method::GET);
        assert_eq!(handle.url().as_str(), "https://api.example.com/search?q=a+b");
        assert!(handle.body_bytes().is_none());
    }

    #[test]
    fn test_request_appends_to_existing_query() {
        let query = QueryData::from([("page", "2")]);
        let handle = service().request("/search?q=x", &query, RequestOptions::default()).unwrap();
        assert_eq!(handle.url().as_str(), "https://api.example.com/search?q=x&page=2");
    }

    #[test]
    fn test_request_passes_options_through() {
        let options = RequestOptions::new()
            .method(Method::PATCH)
            .header(ACCEPT, HeaderValue::from_static("text/plain"))
            .body("payload")
            .timeout(Duration::from_secs(3));

        let handle = service().request("/items/1", &QueryData::new(), options).unwrap();

        assert_eq!(handle.method(), &Method::PATCH);
        assert_eq!(handle.headers()[ACCEPT], "text/plain");
        assert_eq!(handle.body_bytes(), Some(&b"payload"[..]));
        assert_eq!(handle.request.timeout(), Some(&Duration::from_secs(3)));
    }

    #[test]
    fn test_paths_resolve_with_standard_rules() {
        let service = Service::new("https://api.example.com/v1/").unwrap();
        let none = QueryData::new();

        let relative = service.request("users", &none, RequestOptions::default()).unwrap();
        assert_eq!(relative.url().as_str(), "https://api.example.com/v1/users");

        let absolute = service.request("/users", &none, RequestOptions::default()).unwrap();
        assert_eq!(absolute.url().as_str(), "https://api.example.com/users");

        let escaped = service.request("../admin", &none, RequestOptions::default()).unwrap();
        assert_eq!(escaped.url().as_str(), "https://api.example.com/admin");
    }

    #[test]
    fn test_post_json_sets_body_and_content_type() {
        let service = service();
        let handle = service.post_json("/users", &QueryData::new(), &json!({ "name": "a" })).unwrap();

        assert_eq!(handle.method(), &Method::POST);
        assert_eq!(handle.url().as_str(), "https://api.example.com/users");
        assert_eq!(handle.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(handle.body_bytes(), Some(&br#"{"name":"a"}"#[..]));
    }

    #[test]
    fn test_post_json_serialization_error_is_synchronous() {
        use std::collections::HashMap;

        // Non-string map keys cannot be represented in JSON.
        let mut payload = HashMap::new();
        payload.insert((1, 2), "value");

        let err = service().post_json("/users", &QueryData::new(), &payload).unwrap_err();
        assert!(matches!(err, ServiceError::JsonError(_)));
    }

    #[test]
    fn test_post_form_sets_body_and_content_type() {
        let payload = QueryData::from([("user", "a"), ("pass", "b")]);
        let handle = service().post_form("/login", &QueryData::new(), &payload).unwrap();

        assert_eq!(handle.method(), &Method::POST);
        assert_eq!(handle.headers()[CONTENT_TYPE], "application/x-www-form-urlencoded");
        assert_eq!(handle.body_bytes(), Some(&b"user=a&pass=b"[..]));
    }

    #[test]
    fn test_every_call_uses_the_service_pool() {
        let service = service();
        let pool_id = service.pool().id();
        let none = QueryData::new();

        let handles = [
            service.request("/a", &none, RequestOptions::default()).unwrap(),
            service.post_json("/b", &none, &json!([1, 2])).unwrap(),
            service.post_form("/c", &none, &QueryData::from([("k", "v")])).unwrap(),
        ];

        assert!(handles.iter().all(|handle| handle.pool_id() == pool_id));
        assert_ne!(Service::new("https://api.example.com").unwrap().pool().id(), pool_id);
    }

    #[test]
    fn test_plain_service_refuses_https_paths() {
        let service = Service::new("http://api.example.com").unwrap();
        let err = service
            .request("https://other.example.com/x", &QueryData::new(), RequestOptions::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedProtocol { transport: Transport::Plain, .. }));
    }

    #[test]
    fn test_from_config_uses_configured_root() {
        let config = ServiceConfig {
            root_url: "http://localhost:9000".to_string(),
            user_agent: "custom/1.0".to_string(),
        };
        let service = Service::from_config(&config).unwrap();
        assert_eq!(service.root_url(), "http://localhost:9000");
        assert_eq!(service.transport(), Transport::Plain);
    }
}
