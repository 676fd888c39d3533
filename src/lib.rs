/* src/lib.rs */
//! # Request IP
//!
//! Resolve the originating client IP of an HTTP request by checking an ordered
//! list of forwarding headers, falling back to the transport peer address.
//!
//! ## Features
//!
//! - Default priority list of seven well-known forwarding headers
//! - Caller-supplied header lists that replace the defaults outright
//! - Peer address fallback over connection, socket, nested socket and request info
//! - `http` feature: [`RequestView`] for `http::Request` and `http::request::Parts`
//! - `axum` feature: tower layer and extractor
//! - `serde` feature: deserialize [`Options`] from configuration files
//!
//! Values are returned verbatim. Nothing here checks that a value is a valid
//! IP address or that a header was not spoofed; that policy belongs to the caller.
//!
//! ## Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use request_ip::{resolve, Options, SimpleRequest, DEFAULT_HEADERS};
//!
//! let request = SimpleRequest::new()
//!     .with_header("x-client-ip", "10.0.0.1")
//!     .with_header("x-forwarded-for", "10.0.0.2")
//!     .with_connection_address("127.0.0.1");
//!
//! assert_eq!(resolve(&request, None), Some("10.0.0.1".to_string()));
//!
//! // A custom list replaces the defaults; it is not appended.
//! let options = Options::new().with_headers(["x-forwarded-for"]);
//! assert_eq!(resolve(&request, Some(&options)), Some("10.0.0.2".to_string()));
//!
//! // Extend the defaults explicitly when that is what you want.
//! let options = Options::new().with_headers(DEFAULT_HEADERS.iter().copied().chain(["x-custom"]));
//! assert_eq!(options.headers.map(|h| h.len()), Some(8));
//! ```

pub mod config;
pub mod error;
pub mod request;
pub mod resolver;

#[cfg(feature = "axum")]
pub mod middleware;

pub use config::{Config, DEFAULT_HEADERS, Options};
pub use error::{RequestIpError, Result};
pub use request::{Connection, HeaderMap, RequestInfo, RequestView, SimpleRequest, Socket};
pub use resolver::{resolve, resolve_with, try_resolve};

#[cfg(feature = "axum")]
pub use middleware::{ClientIp, ClientIpLayer, ClientIpService};
