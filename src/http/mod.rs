//! HTTP service client with a managed keep-alive connection pool.
//!
//! This module wraps [`reqwest`] so that every request to a service reuses
//! one connection pool, has its query data merged into the path and is
//! resolved against a configured root URL.
//!
//! # Architecture
//!
//! - [`Service`] - Root URL plus the pool it owns; issues requests
//! - [`ConnectionPool`] / [`Transport`] - Keep-alive pool scoped to plain or encrypted transport
//! - [`QueryData`] - Ordered parameters, encoded as `application/x-www-form-urlencoded`
//! - [`RequestOptions`] - Method, headers, body and timeout passed through to the client
//! - [`ResponseHandle`] - Prepared request; await it to get the raw response
//! - [`ServiceError`] - Every failure mode, surfaced unchanged
//!
//! # Example
//!
//! ```rust,no_run
//! use http_service::http::{QueryData, RequestOptions, Service};
//!
//! # async fn example() -> Result<(), http_service::http::ServiceError> {
//! let service = Service::new("https://api.example.com")?;
//!
//! // GET https://api.example.com/search?q=a+b
//! let response = service
//!     .request("/search", &QueryData::from([("q", "a b")]), RequestOptions::default())?
//!     .await?;
//! println!("{}", response.status());
//!
//! // POST a form body
//! let login = QueryData::from([("user", "a"), ("pass", "b")]);
//! service.post_form("/login", &QueryData::new(), &login)?.await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Path resolution, serialization and protocol mismatches fail when the
//! request is prepared. Transport failures only surface once the
//! [`ResponseHandle`] is awaited. Nothing is retried.

mod error;
mod options;
mod pool;
mod query;
mod service;

pub use error::{ServiceError, ServiceResult};
pub use options::RequestOptions;
pub use pool::{ConnectionPool, KEEP_ALIVE_INTERVAL, MAX_FREE_SOCKETS, Transport};
pub use query::{QueryData, QueryValue, attach_query_data};
pub use service::{DEFAULT_USER_AGENT, ResponseHandle, Service};
