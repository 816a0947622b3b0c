//! A keep-alive HTTP client for talking to a single service.
//!
//! See [`http::Service`] for the entry point.

pub mod config;
pub mod http;
pub mod logging;

pub use crate::config::ServiceConfig;
pub use crate::http::{QueryData, RequestOptions, ResponseHandle, Service, ServiceError};
