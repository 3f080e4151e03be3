//! Error envelope returned by every API route.
//!
//! Body shape: `{ "error": { "code": "...", "message": "..." } }`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain_scout_lib::{DomainScoutError, UpstreamRejection};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub retry_after: Option<Duration>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn new<M: Into<String>>(status: StatusCode, code: &'static str, message: M) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn missing_param(name: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_QUERY",
            format!("Missing '{}' parameter", name),
        )
    }

    /// The client exceeded its request budget.
    pub fn rate_limited(retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many requests. Please try again later.",
            )
        }
    }

    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl From<DomainScoutError> for ApiError {
    fn from(err: DomainScoutError) -> Self {
        let status = match &err {
            DomainScoutError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            DomainScoutError::Upstream { kind, .. } => match kind {
                UpstreamRejection::AuthFailed => StatusCode::UNAUTHORIZED,
                UpstreamRejection::NotSubscribed => StatusCode::FORBIDDEN,
                UpstreamRejection::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                UpstreamRejection::BadRequest => StatusCode::BAD_REQUEST,
                UpstreamRejection::ServerError | UpstreamRejection::Other => StatusCode::BAD_GATEWAY,
            },
            DomainScoutError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            DomainScoutError::Network { .. }
            | DomainScoutError::MissingStatus { .. }
            | DomainScoutError::Parse { .. } => StatusCode::BAD_GATEWAY,
            DomainScoutError::Config { .. }
            | DomainScoutError::File { .. }
            | DomainScoutError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let retry_after = match &err {
            DomainScoutError::Upstream { retry_after, .. } => *retry_after,
            _ => None,
        };

        Self {
            status,
            code: err.code(),
            message: err.to_string(),
            retry_after,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, message = %self.message, "request failed");
        } else {
            tracing::debug!(code = self.code, message = %self.message, "request rejected");
        }

        let body = Json(ErrorEnvelope {
            error: ErrorBody {
                code: self.code,
                message: &self.message,
            },
        });
        let mut response = (self.status, body).into_response();

        if let Some(retry_after) = self.retry_after {
            // Round up so clients never retry early
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&secs.max(1).to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_rejection_mapping() {
        let cases = [
            (401, StatusCode::UNAUTHORIZED, "AUTH_FAILED"),
            (403, StatusCode::FORBIDDEN, "NOT_SUBSCRIBED"),
            (429, StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            (422, StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (500, StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        ];
        for (upstream, status, code) in cases {
            let err = ApiError::from(DomainScoutError::upstream(upstream, "x"));
            assert_eq!(err.status, status);
            assert_eq!(err.code, code);
        }
    }

    #[test]
    fn test_timeout_is_gateway_timeout() {
        let err = ApiError::from(DomainScoutError::timeout("status lookup", Duration::from_secs(10)));
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let response = ApiError::rate_limited(Duration::from_millis(1500)).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
    }
}
