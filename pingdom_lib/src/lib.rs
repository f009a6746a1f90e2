//! Pingdom API client library.
//!
//! Holds the shared request/response plumbing for the Pingdom REST API:
//! authenticated request construction, status validation, and JSON decoding
//! into caller-supplied types. Resource-specific wrappers are built on top of
//! [`Client::new_request`] and [`Client::execute`].

pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::{Client, Params};
pub use config::{default_http_client, ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, Error};
pub use response::Response;

/// Library version for User-Agent and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
