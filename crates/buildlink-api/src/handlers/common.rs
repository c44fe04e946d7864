//! Shared handler utilities.

use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{ApiResponse, ErrorResponse};

/// Result type for all API handlers.
pub type HandlerResult<T> = Result<Json<ApiResponse<T>>, ErrorResponse>;

/// Result type for extraction helpers.
pub type ExtractResult<T> = Result<T, ErrorResponse>;

/// `?ids=a,b,c` filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdsQuery {
    pub ids: Option<String>,
}

impl IdsQuery {
    /// Split the comma-separated list. Blank entries are dropped.
    pub fn ids(&self) -> Vec<String> {
        self.ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// `?start=..&end=..` in RFC 3339.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TimeRangeQuery {
    /// Parse the range; `start` is required, `end` defaults downstream.
    pub fn parse(&self) -> ExtractResult<(DateTime<Utc>, Option<DateTime<Utc>>)> {
        let start = self
            .start
            .as_deref()
            .ok_or_else(|| ErrorResponse::bad_request("Missing required query parameter: start"))
            .and_then(|v| parse_time("start", v))?;
        let end = self
            .end
            .as_deref()
            .map(|v| parse_time("end", v))
            .transpose()?;
        Ok((start, end))
    }
}

fn parse_time(name: &str, value: &str) -> ExtractResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| {
            ErrorResponse::bad_request(format!(
                "Invalid query parameter '{}': {} (expected RFC 3339)",
                name, value
            ))
        })
}

/// Create a successful response with data.
pub fn ok<T: serde::Serialize>(data: T) -> HandlerResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
