use std::time::Duration;

use thiserror::Error;

/// Errors from [`DistanceMatrixProvider`](super::DistanceMatrixProvider) and
/// [`RouteGeometryProvider`](super::RouteGeometryProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// No coordinates were provided.
    ///
    /// Providers need at least one coordinate (two for routes).
    #[error("at least one coordinate is required")]
    EmptyInput,

    /// The routing service did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },

    /// The routing service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },

    /// The routing service could not be reached.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Error detail.
        message: String,
    },

    /// The routing service reported a failure code.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `NoRoute`.
        code: String,
        /// Message accompanying the code.
        message: String,
    },

    /// A required member was absent from the response.
    #[error("routing response missing '{field}'")]
    MissingField {
        /// Name of the absent member.
        field: &'static str,
    },

    /// The returned matrix was unusable: wrong dimensions or an unroutable
    /// pair.
    #[error("invalid distance matrix: {message}")]
    InvalidMatrix {
        /// Error detail.
        message: String,
    },
}
