/* src/request.rs */

use std::borrow::Cow;
use std::collections::HashMap;

/// Type alias for plain header maps with string keys and values.
pub type HeaderMap = HashMap<String, String>;

/// Read-only view of an incoming request.
///
/// Only [`header`](RequestView::header) is required. The peer address
/// accessors default to `None` so request shapes that lack some transport
/// path simply skip it.
pub trait RequestView {
    /// Look up a header value by name, ignoring ASCII case.
    fn header(&self, name: &str) -> Option<&str>;

    /// Remote address recorded on the connection object.
    fn connection_remote_address(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Remote address recorded on the socket object.
    fn socket_remote_address(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Remote address of the socket nested under the connection object.
    fn connection_socket_remote_address(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Remote address from an alternative request metadata object.
    fn info_remote_address(&self) -> Option<Cow<'_, str>> {
        None
    }
}

/// Empty values count as absent. When only case variants of `name` are
/// present, the smallest non-empty key wins.
fn lookup<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    if let Some(value) = headers.get(name).filter(|v| !v.is_empty()) {
        return Some(value.as_str());
    }
    headers
        .iter()
        .filter(|(key, value)| !value.is_empty() && key.eq_ignore_ascii_case(name))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, value)| value.as_str())
}

impl RequestView for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        lookup(self, name)
    }
}

impl<T: RequestView + ?Sized> RequestView for &T {
    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }

    fn connection_remote_address(&self) -> Option<Cow<'_, str>> {
        (**self).connection_remote_address()
    }

    fn socket_remote_address(&self) -> Option<Cow<'_, str>> {
        (**self).socket_remote_address()
    }

    fn connection_socket_remote_address(&self) -> Option<Cow<'_, str>> {
        (**self).connection_socket_remote_address()
    }

    fn info_remote_address(&self) -> Option<Cow<'_, str>> {
        (**self).info_remote_address()
    }
}

/// A socket with an optional recorded peer address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Socket {
    pub remote_address: Option<String>,
}

/// A connection with an optional peer address and an optional underlying socket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub remote_address: Option<String>,
    pub socket: Option<Socket>,
}

/// Request metadata some stacks keep apart from the connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    pub remote_address: Option<String>,
}

/// In-memory request shape for stacks that do not use the `http` crate.
///
/// # Examples
///
/// ```rust
/// use request_ip::{resolve, SimpleRequest};
///
/// let request = SimpleRequest::new()
///     .with_header("X-Forwarded-For", "10.1.1.1")
///     .with_connection_address("127.0.0.1");
///
/// assert_eq!(resolve(&request, None), Some("10.1.1.1".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleRequest {
    pub headers: HeaderMap,
    pub connection: Option<Connection>,
    pub socket: Option<Socket>,
    pub info: Option<RequestInfo>,
}

impl SimpleRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the header map.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Add a single header. Names are stored lowercased.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Set the connection's remote address, keeping any nested socket.
    pub fn with_connection_address(mut self, address: impl Into<String>) -> Self {
        self.connection
            .get_or_insert_with(Connection::default)
            .remote_address = Some(address.into());
        self
    }

    pub fn with_socket_address(mut self, address: impl Into<String>) -> Self {
        self.socket = Some(Socket {
            remote_address: Some(address.into()),
        });
        self
    }

    pub fn with_info_address(mut self, address: impl Into<String>) -> Self {
        self.info = Some(RequestInfo {
            remote_address: Some(address.into()),
        });
        self
    }
}

fn borrowed(value: &Option<String>) -> Option<Cow<'_, str>> {
    value.as_deref().map(Cow::Borrowed)
}

impl RequestView for SimpleRequest {
    fn header(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }

    fn connection_remote_address(&self) -> Option<Cow<'_, str>> {
        self.connection
            .as_ref()
            .and_then(|c| borrowed(&c.remote_address))
    }

    fn socket_remote_address(&self) -> Option<Cow<'_, str>> {
        self.socket.as_ref().and_then(|s| borrowed(&s.remote_address))
    }

    fn connection_socket_remote_address(&self) -> Option<Cow<'_, str>> {
        self.connection
            .as_ref()
            .and_then(|c| c.socket.as_ref())
            .and_then(|s| borrowed(&s.remote_address))
    }

    fn info_remote_address(&self) -> Option<Cow<'_, str>> {
        self.info.as_ref().and_then(|i| borrowed(&i.remote_address))
    }
}

#[cfg(feature = "http")]
mod http_impl {
    use std::borrow::Cow;
    use std::net::SocketAddr;

    use http::{Extensions, HeaderMap, Request, request::Parts};

    use super::RequestView;

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        // Non UTF-8 values count as absent.
        headers.get(name).and_then(|value| value.to_str().ok())
    }

    #[cfg(feature = "axum")]
    fn connect_info(extensions: &Extensions) -> Option<Cow<'static, str>> {
        extensions
            .get::<axum::extract::ConnectInfo<SocketAddr>>()
            .map(|info| Cow::Owned(info.0.ip().to_string()))
    }

    #[cfg(not(feature = "axum"))]
    fn connect_info(_extensions: &Extensions) -> Option<Cow<'static, str>> {
        None
    }

    fn socket_addr(extensions: &Extensions) -> Option<Cow<'static, str>> {
        extensions
            .get::<SocketAddr>()
            .map(|addr| Cow::Owned(addr.ip().to_string()))
    }

    impl<B> RequestView for Request<B> {
        fn header(&self, name: &str) -> Option<&str> {
            header(self.headers(), name)
        }

        fn connection_remote_address(&self) -> Option<Cow<'_, str>> {
            connect_info(self.extensions())
        }

        fn socket_remote_address(&self) -> Option<Cow<'_, str>> {
            socket_addr(self.extensions())
        }
    }

    impl RequestView for Parts {
        fn header(&self, name: &str) -> Option<&str> {
            header(&self.headers, name)
        }

        fn connection_remote_address(&self) -> Option<Cow<'_, str>> {
            connect_info(&self.extensions)
        }

        fn socket_remote_address(&self) -> Option<Cow<'_, str>> {
            socket_addr(&self.extensions)
        }
    }

}
