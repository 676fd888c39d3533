/* src/middleware.rs */

use axum::{extract::Request, http::request::Parts, response::Response};
use futures_util::future::BoxFuture;
use std::{
    convert::Infallible,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::config::{Config, Options};
use crate::error::RequestIpError;
use crate::resolver::resolve_with;

/// Extension that holds the resolved client IP, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    /// Get the resolved value.
    pub fn ip(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Layer that resolves the client IP once per request and stores it as a
/// [`ClientIp`] extension.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use request_ip::{ClientIp, ClientIpLayer, Options};
///
/// async fn handler(ip: ClientIp) -> String {
///     ip.into_inner()
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(ClientIpLayer::with_options(&Options::new().with_headers(["x-real-ip"])));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientIpLayer {
    config: Arc<Config>,
}

impl ClientIpLayer {
    /// Create a layer using the default header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer from caller overrides merged over the defaults.
    pub fn with_options(options: &Options) -> Self {
        Self::with_config(Config::from(options))
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for ClientIpLayer {
    type Service = ClientIpService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClientIpService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Marks a request the layer has already handled.
#[derive(Debug, Clone, Copy)]
struct Resolved;

/// Service produced by [`ClientIpLayer`].
#[derive(Debug, Clone)]
pub struct ClientIpService<S> {
    inner: S,
    config: Arc<Config>,
}

impl<S> Service<Request> for ClientIpService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        if let Some(ip) = resolve_with(&req, &self.config) {
            req.extensions_mut().insert(ClientIp(ip));
        }
        req.extensions_mut().insert(Resolved);

        let future = self.inner.call(req);
        Box::pin(future)
    }
}

fn from_parts(parts: &Parts) -> Option<ClientIp> {
    if let Some(ip) = parts.extensions.get::<ClientIp>() {
        return Some(ip.clone());
    }
    // The layer already ran and found nothing.
    if parts.extensions.get::<Resolved>().is_some() {
        return None;
    }
    resolve_with(parts, &Config::default()).map(ClientIp)
}

/// Axum extractor for the client IP.
///
/// Uses the result of [`ClientIpLayer`] when the layer is installed, otherwise
/// resolves from the request with the default header list. Rejects with
/// [`RequestIpError::Unresolved`] when nothing is found; extract
/// `Option<ClientIp>` to handle that case yourself.
impl<S> axum::extract::FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = RequestIpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        from_parts(parts).ok_or(RequestIpError::Unresolved)
    }
}

impl<S> axum::extract::OptionalFromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(from_parts(parts))
    }
}
