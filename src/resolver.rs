/* src/resolver.rs */

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::config::{Config, Options};
use crate::error::{RequestIpError, Result};
use crate::request::RequestView;

type PeerAccessor<R> = for<'a> fn(&'a R) -> Option<Cow<'a, str>>;

/// Transport peer address sources, highest priority first.
fn peer_accessors<R: RequestView>() -> [(&'static str, PeerAccessor<R>); 4] {
    [
        ("connection", R::connection_remote_address),
        ("socket", R::socket_remote_address),
        ("connection.socket", R::connection_socket_remote_address),
        ("info", R::info_remote_address),
    ]
}

/// Resolve the client IP of `request`.
///
/// `options` are merged over the defaults; a `headers` list replaces the
/// default list outright. Header values are returned verbatim, so a
/// comma-separated `x-forwarded-for` chain comes back whole.
///
/// # Examples
///
/// ```rust
/// use request_ip::{resolve, HeaderMap, Options};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for".to_string(), "10.1.1.1".to_string());
///
/// assert_eq!(resolve(&headers, None), Some("10.1.1.1".to_string()));
///
/// let none = Options::new().with_headers(Vec::<String>::new());
/// assert_eq!(resolve(&headers, Some(&none)), None);
/// ```
pub fn resolve<R: RequestView>(request: &R, options: Option<&Options>) -> Option<String> {
    match options {
        Some(options) => resolve_with(request, &Config::from(options)),
        None => resolve_with(request, &Config::default()),
    }
}

/// Resolve the client IP of `request` using an already merged configuration.
pub fn resolve_with<R: RequestView>(request: &R, config: &Config) -> Option<String> {
    from_headers(request, config).or_else(|| from_peer(request))
}

/// Like [`resolve`], but reports absence as [`RequestIpError::Unresolved`].
pub fn try_resolve<R: RequestView>(request: &R, options: Option<&Options>) -> Result<String> {
    resolve(request, options).ok_or(RequestIpError::Unresolved)
}

fn from_headers<R: RequestView>(request: &R, config: &Config) -> Option<String> {
    for name in &config.headers {
        // Empty values are treated like missing ones.
        if let Some(value) = request.header(name).filter(|v| !v.is_empty()) {
            trace!(header = %name, ip = %value, "client ip resolved from header");
            return Some(value.to_string());
        }
    }
    None
}

fn from_peer<R: RequestView>(request: &R) -> Option<String> {
    for (source, accessor) in peer_accessors::<R>() {
        if let Some(address) = accessor(request).filter(|a| !a.is_empty()) {
            trace!(source, ip = %address, "client ip resolved from peer address");
            return Some(address.into_owned());
        }
    }
    debug!("no forwarding header or peer address available");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HEADERS;
    use crate::request::{Connection, HeaderMap, SimpleRequest, Socket};

    const HEADER_IP: &str = "10.1.1.1";

    fn with_header(name: &str, value: &str) -> SimpleRequest {
        SimpleRequest::new().with_header(name, value)
    }

    #[test]
    fn test_nothing_resolves_to_none() {
        assert_eq!(resolve(&SimpleRequest::new(), None), None);
        assert_eq!(resolve(&HeaderMap::new(), None), None);
    }

    #[test]
    fn test_every_default_header_is_honored() {
        for header in DEFAULT_HEADERS {
            let request = with_header(header, HEADER_IP).with_connection_address("127.0.0.1");
            assert_eq!(
                resolve(&request, None).as_deref(),
                Some(HEADER_IP),
                "header {header}"
            );
        }
    }

    #[test]
    fn test_value_returned_verbatim() {
        let request = with_header("x-forwarded-for", " 203.0.113.1, 192.168.1.1 ");
        assert_eq!(
            resolve(&request, None).as_deref(),
            Some(" 203.0.113.1, 192.168.1.1 ")
        );

        let request = with_header("x-client-ip", "not-an-ip");
        assert_eq!(resolve(&request, None).as_deref(), Some("not-an-ip"));
    }

    #[test]
    fn test_first_header_wins() {
        let request =
            with_header("x-forwarded-for", "10.0.0.2").with_header("x-client-ip", "10.0.0.1");
        assert_eq!(resolve(&request, None).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_empty_header_is_skipped() {
        let request = with_header("x-client-ip", "").with_header("x-real-ip", "10.0.0.3");
        assert_eq!(resolve(&request, None).as_deref(), Some("10.0.0.3"));

        let request = with_header("x-client-ip", "").with_socket_address("127.0.0.1");
        assert_eq!(resolve(&request, None).as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_empty_header_list_disables_headers() {
        let options = Options::new().with_headers(Vec::<String>::new());
        for header in DEFAULT_HEADERS {
            let request = with_header(header, HEADER_IP);
            assert_eq!(resolve(&request, Some(&options)), None, "header {header}");

            let request = request.with_connection_address("127.0.0.1");
            assert_eq!(
                resolve(&request, Some(&options)).as_deref(),
                Some("127.0.0.1")
            );
        }
    }

    #[test]
    fn test_custom_headers_replace_defaults() {
        let custom = ["x-custom-header-one", "x-custom-header-two"];
        let options = Options::new().with_headers(custom);

        for header in DEFAULT_HEADERS {
            let request = with_header(header, HEADER_IP);
            assert_ne!(
                resolve(&request, Some(&options)).as_deref(),
                Some(HEADER_IP),
                "default header {header} should be ignored"
            );
        }
        for header in custom {
            let request = with_header(header, HEADER_IP);
            assert_eq!(
                resolve(&request, Some(&options)).as_deref(),
                Some(HEADER_IP),
                "custom header {header}"
            );
        }
    }

    #[test]
    fn test_custom_header_lookup_ignores_case() {
        let options = Options::new().with_headers(["X-Custom"]);
        let request = with_header("x-custom", HEADER_IP);
        assert_eq!(resolve(&request, Some(&options)).as_deref(), Some(HEADER_IP));
    }

    #[test]
    fn test_peer_priority() {
        let all = SimpleRequest::new()
            .with_connection(Connection {
                remote_address: Some("10.0.0.1".to_string()),
                socket: Some(Socket {
                    remote_address: Some("10.0.0.3".to_string()),
                }),
            })
            .with_socket_address("10.0.0.2")
            .with_info_address("10.0.0.4");
        assert_eq!(resolve(&all, None).as_deref(), Some("10.0.0.1"));

        let mut request = all.clone();
        request.connection.as_mut().unwrap().remote_address = None;
        assert_eq!(resolve(&request, None).as_deref(), Some("10.0.0.2"));

        request.socket = None;
        assert_eq!(resolve(&request, None).as_deref(), Some("10.0.0.3"));

        request.connection = None;
        assert_eq!(resolve(&request, None).as_deref(), Some("10.0.0.4"));

        request.info = None;
        assert_eq!(resolve(&request, None), None);
    }

    #[test]
    fn test_empty_peer_address_is_skipped() {
        let request = SimpleRequest::new()
            .with_connection_address("")
            .with_socket_address("127.0.0.1");
        assert_eq!(resolve(&request, None).as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_scenario_connection_only() {
        let request = SimpleRequest::new().with_connection_address("127.0.0.1");
        assert_eq!(resolve(&request, None).as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_scenario_forwarded_for() {
        let request = with_header("x-forwarded-for", HEADER_IP);
        assert_eq!(resolve(&request, None).as_deref(), Some(HEADER_IP));
    }

    #[test]
    fn test_scenario_forwarded_for_disabled() {
        let options = Options::new().with_headers(Vec::<String>::new());
        let request = with_header("x-forwarded-for", HEADER_IP);
        assert_eq!(resolve(&request, Some(&options)), None);
    }

    #[test]
    fn test_scenario_misspelled_fowarded() {
        let request = with_header("fowarded", HEADER_IP);
        assert_eq!(resolve(&request, None).as_deref(), Some(HEADER_IP));
    }

    #[test]
    fn test_request_is_not_mutated() {
        let request = with_header("x-real-ip", HEADER_IP).with_socket_address("127.0.0.1");
        let before = request.clone();
        let options = Options::new().with_headers(["x-real-ip"]);
        let _ = resolve(&request, Some(&options));
        assert_eq!(request, before);
        assert_eq!(options, Options::new().with_headers(["x-real-ip"]));
    }

    #[test]
    fn test_same_input_same_result() {
        let build = || {
            let mut headers = HeaderMap::new();
            headers.insert("X-Forwarded-For".to_string(), String::new());
            headers.insert("x-forwarded-FOR".to_string(), "10.0.0.8".to_string());
            headers.insert("X-FORWARDED-FOR".to_string(), "10.0.0.9".to_string());
            SimpleRequest::new()
                .with_headers(headers)
                .with_socket_address("127.0.0.1")
        };
        let expected = resolve(&build(), None);
        assert_eq!(expected.as_deref(), Some("10.0.0.9"));
        for _ in 0..64 {
            assert_eq!(resolve(&build(), None), expected);
        }
    }

    #[test]
    fn test_try_resolve() {
        assert_eq!(
            try_resolve(&SimpleRequest::new(), None),
            Err(RequestIpError::Unresolved)
        );
        let request = SimpleRequest::new().with_info_address("::1");
        assert_eq!(try_resolve(&request, None), Ok("::1".to_string()));
    }

    #[test]
    fn test_resolve_with_merged_config() {
        let config = Config::default().merge(&Options::new().with_headers(["x-real-ip"]));
        let request = with_header("x-client-ip", "10.0.0.1").with_header("x-real-ip", "10.0.0.2");
        assert_eq!(resolve_with(&request, &config).as_deref(), Some("10.0.0.2"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_resolve_http_request() {
        use std::net::SocketAddr;

        let mut request = http::Request::builder()
            .header("X-Cluster-Client-IP", "198.51.100.9")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(resolve(&request, None).as_deref(), Some("198.51.100.9"));

        let options = Options::new().with_headers(Vec::<String>::new());
        assert_eq!(
            resolve(&request, Some(&options)).as_deref(),
            Some("127.0.0.1")
        );
    }
}
