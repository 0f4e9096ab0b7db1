//! Shared handler utilities
//!
//! Body decoding, path parsing, the success envelope and metrics helpers
//! used across handlers.

use std::time::Instant;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use subtrack_types::SubscriptionId;

use crate::error::ApiError;

// ============================================================================
// Request Parsing
// ============================================================================

/// Decode a JSON request body.
///
/// A missing or whitespace-only body is reported separately from a malformed
/// one.
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("empty request"));
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Failed to decode request body");
        ApiError::BadRequest("failed to decode request")
    })
}

/// Parse the `{id}` path segment
pub fn parse_id(raw: &str) -> Result<SubscriptionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("invalid subscription id format"))
}

/// Parse an optional numeric query parameter. Empty means absent.
pub fn parse_query_number(
    raw: Option<&str>,
    invalid: &'static str,
) -> Result<Option<i64>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(invalid)),
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Success envelope: the payload's fields plus `"status": "OK"`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(flatten)]
    pub body: T,
}

/// Empty success payload
#[derive(Debug, Serialize)]
pub struct Empty {}

/// Render a success envelope with the given status code
pub fn ok<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(Envelope { status: "OK", body })).into_response()
}

// ============================================================================
// Metrics Helpers
// ============================================================================

/// Record HTTP operation duration with result label.
///
/// Labels: operation, result (ok/err)
#[inline]
pub fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "subscription_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[allow(dead_code)]
        name: String,
    }

    #[test]
    fn test_parse_body_empty() {
        let err = parse_body::<Probe>(&Bytes::new()).unwrap_err();
        assert_eq!(err.to_string(), "empty request");

        let err = parse_body::<Probe>(&Bytes::from_static(b"  \n")).unwrap_err();
        assert_eq!(err.to_string(), "empty request");
    }

    #[test]
    fn test_parse_body_malformed() {
        let err = parse_body::<Probe>(&Bytes::from_static(b"{\"name\":")).unwrap_err();
        assert_eq!(err.to_string(), "failed to decode request");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), SubscriptionId(12));
        assert_eq!(
            parse_id("twelve").unwrap_err().to_string(),
            "invalid subscription id format"
        );
    }

    #[test]
    fn test_parse_query_number() {
        assert_eq!(parse_query_number(None, "bad").unwrap(), None);
        assert_eq!(parse_query_number(Some(""), "bad").unwrap(), None);
        assert_eq!(parse_query_number(Some("-3"), "bad").unwrap(), Some(-3));
        assert_eq!(
            parse_query_number(Some("x"), "invalid limit format")
                .unwrap_err()
                .to_string(),
            "invalid limit format"
        );
    }

    #[test]
    fn test_envelope_flattens_payload() {
        #[derive(Serialize)]
        struct Payload {
            id: i64,
        }

        let json = serde_json::to_value(Envelope {
            status: "OK",
            body: Payload { id: 3 },
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": "OK", "id": 3}));

        let empty = serde_json::to_value(Envelope {
            status: "OK",
            body: Empty {},
        })
        .unwrap();
        assert_eq!(empty, serde_json::json!({"status": "OK"}));
    }
}
