//! JSON error responses for the HTTP API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::error::Category;
use tourgate_core::OptimizeError;

use super::rate_limit::RateLimitRule;

/// An error rendered as `{"error": CODE, "message": text}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl ApiError {
    const fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Classify a request body decoding failure.
    ///
    /// Bodies that are not JSON at all are `BAD_REQUEST`; JSON of the wrong
    /// shape is a `VALIDATION_ERROR`.
    pub(crate) fn from_json(err: &serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("request body has the wrong shape: {err}"),
            ),
            Category::Io | Category::Syntax | Category::Eof => Self::new(
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                format!("request body is not valid JSON: {err}"),
            ),
        }
    }

    pub(crate) fn rate_limited(rule: RateLimitRule) -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            format!("rate limit of {rule} exceeded; retry later"),
        )
    }

    pub(crate) fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "internal server error".to_owned(),
        )
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<OptimizeError> for ApiError {
    fn from(err: OptimizeError) -> Self {
        let (status, code) = match &err {
            OptimizeError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            OptimizeError::InvalidLocationCount { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_LOCATION_COUNT")
            }
            OptimizeError::Table(_) => (StatusCode::BAD_GATEWAY, "OSRM_TABLE_FAILED"),
            OptimizeError::Route(_) => (StatusCode::BAD_GATEWAY, "OSRM_ROUTE_FAILED"),
        };
        Self::new(status, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;
    use tourgate_core::{GeoPoint, OptimizeError, RoutingError};

    use super::ApiError;

    fn validation_error() -> OptimizeError {
        let err = GeoPoint::new(91.0, 0.0).expect_err("latitude out of range");
        OptimizeError::Validation(err)
    }

    #[rstest]
    #[case::validation(validation_error(), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
    #[case::count(
        OptimizeError::InvalidLocationCount { count: 4, max: 3 },
        StatusCode::BAD_REQUEST,
        "INVALID_LOCATION_COUNT"
    )]
    #[case::table(
        OptimizeError::Table(RoutingError::EmptyInput),
        StatusCode::BAD_GATEWAY,
        "OSRM_TABLE_FAILED"
    )]
    #[case::route(
        OptimizeError::Route(RoutingError::EmptyInput),
        StatusCode::BAD_GATEWAY,
        "OSRM_ROUTE_FAILED"
    )]
    fn maps_pipeline_errors(
        #[case] err: OptimizeError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let message = err.to_string();
        let api = ApiError::from(err);

        assert_eq!(api.status(), status);
        assert_eq!(api.code(), code);
        assert_eq!(api.message(), message);
    }

    #[rstest]
    #[case::syntax("{not json", "BAD_REQUEST")]
    #[case::eof("{\"depot\":", "BAD_REQUEST")]
    #[case::missing_field("{\"depot\": {\"lat\": 0.0, \"lng\": 0.0}}", "VALIDATION_ERROR")]
    #[case::wrong_type("{\"depot\": \"here\", \"locations\": []}", "VALIDATION_ERROR")]
    #[case::not_an_object("[1, 2]", "VALIDATION_ERROR")]
    fn classifies_body_errors(#[case] body: &str, #[case] code: &str) {
        let err = serde_json::from_str::<tourgate_core::OptimizePayload>(body)
            .expect_err("body must be rejected");

        assert_eq!(ApiError::from_json(&err).code(), code);
    }
}
