//! Error responses with HTTP status codes.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::common::{ApiError, ApiResponse};

/// API error response carrying its HTTP status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    pub message: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
        }
    }

    /// Bad request (400).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message, StatusCode::BAD_REQUEST)
    }

    /// Not found (404).
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("{} not found", resource.into()),
            StatusCode::NOT_FOUND,
        )
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        let body: ApiResponse<()> = ApiResponse::error(ApiError::new(self.code, self.message));
        (status, axum::Json(body)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

impl From<buildlink_core::Error> for ErrorResponse {
    fn from(e: buildlink_core::Error) -> Self {
        use buildlink_core::Error;

        let status = match &e {
            Error::InvalidRange { .. } => StatusCode::BAD_REQUEST,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        };
        if e.is_upstream() {
            warn!(code = e.code(), error = %e, "Upstream failure");
        }
        Self::new(e.code(), e.to_string(), status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildlink_core::{DecodeError, Error};
    use chrono::{Duration, Utc};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::Transport("reset".into()), StatusCode::BAD_GATEWAY),
            (
                Error::UpstreamStatus {
                    status: 404,
                    body: String::new(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (DecodeError::InvalidPath("x".into()).into(), StatusCode::BAD_GATEWAY),
            (Error::Json("eof".into()), StatusCode::BAD_GATEWAY),
            (Error::Auth("no token".into()), StatusCode::BAD_GATEWAY),
            (
                Error::InvalidRange {
                    start: Utc::now(),
                    end: Utc::now() - Duration::hours(1),
                },
                StatusCode::BAD_REQUEST,
            ),
            (Error::Config("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            let code = error.code();
            let response = ErrorResponse::from(error);
            assert_eq!(response.status, status, "{}", code);
            assert_eq!(response.code, code);
        }
    }

    #[test]
    fn test_into_response_status() {
        let response = ErrorResponse::bad_request("ids").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
