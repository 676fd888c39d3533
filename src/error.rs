/* src/error.rs */

use thiserror::Error;

/// Result type alias for operations that may fail with `RequestIpError`.
pub type Result<T> = std::result::Result<T, RequestIpError>;

/// Errors surfaced by the fallible entry points.
///
/// [`resolve`](crate::resolve) itself never fails; this type exists for
/// callers that want absence as an error, such as [`try_resolve`](crate::try_resolve)
/// and the axum extractor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestIpError {
    /// Neither a forwarding header nor a transport peer address yielded a value.
    #[error("Could not determine client IP address")]
    Unresolved,
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for RequestIpError {
    fn into_response(self) -> axum::response::Response {
        axum::response::IntoResponse::into_response((
            axum::http::StatusCode::BAD_REQUEST,
            self.to_string(),
        ))
    }
}
