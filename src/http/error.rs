//! Error types for service client operations.
//!
//! This module defines the [`ServiceError`] enum which covers every failure
//! the [`Service`](super::Service) can surface. Nothing here is recovered or
//! retried: each error reaches the immediate caller unchanged.

use thiserror::Error;

use super::pool::Transport;

/// Errors that can occur while building or dispatching a service request.
///
/// # Error Categories
///
/// - **Construction**: [`PoolCreation`](ServiceError::PoolCreation)
/// - **Before dispatch** (returned by `request`, `post_json`, `post_form`):
///   [`UrlError`](ServiceError::UrlError),
///   [`JsonError`](ServiceError::JsonError),
///   [`InvalidRequest`](ServiceError::InvalidRequest),
///   [`UnsupportedProtocol`](ServiceError::UnsupportedProtocol)
/// - **Dispatch** (returned when a [`ResponseHandle`](super::ResponseHandle)
///   is awaited): [`RequestFailed`](ServiceError::RequestFailed)
///
/// # Example
///
/// ```rust,no_run
/// use http_service::http::ServiceError;
///
/// fn handle_error(err: ServiceError) {
///     match err {
///         ServiceError::UrlError(e) => eprintln!("Bad path: {}", e),
///         ServiceError::RequestFailed(e) => eprintln!("Network error: {}", e),
///         _ => eprintln!("Other error: {}", err),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The connection pool could not be created.
    ///
    /// This usually means the TLS backend failed to initialise.
    #[error("Connection pool creation failed: {0}")]
    PoolCreation(#[source] reqwest::Error),

    /// The root URL or the composed path could not be resolved.
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// The JSON payload could not be serialized.
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The underlying client refused to assemble the request.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    /// The resolved URL uses a scheme the service's pool does not serve.
    ///
    /// A pool created for an `https:` root only carries `https` requests and
    /// a plain pool only carries `http` requests.
    #[error("Protocol \"{scheme}:\" not supported by {transport} pool")]
    UnsupportedProtocol {
        /// Transport of the service's pool.
        transport: Transport,
        /// Scheme of the resolved request URL.
        scheme: String,
    },

    /// The request failed in transit.
    ///
    /// Connection refused, DNS failure, TLS handshake errors and
    /// caller-configured timeouts all land here.
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
