//! Error types for the Subscription API service.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};
use serde::Serialize;
use subtrack_core::CoreError;
use subtrack_types::ValidationError;

/// Error envelope: `{"status": "Error", "error": "<message>"}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

/// API error type.
///
/// The display string of each variant is the client-visible message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("subscription not found")]
    SubscriptionNotFound,

    #[error("subscription already exists")]
    SubscriptionExists,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(&'static str),

    /// Storage rejected the values; the detail is logged, not returned
    #[error("subscription violates storage constraints")]
    ConstraintViolation(String),

    #[error("requested API endpoint not found")]
    RouteNotFound,

    #[error("request timed out")]
    Timeout,

    /// Panic or middleware failure; details are logged where it is raised
    #[error("internal server error")]
    Unexpected,

    /// Storage failure; `context` is what the client sees
    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: CoreError,
    },
}

impl ApiError {
    /// Map a service error, using `context` as the message for storage failures
    pub fn from_core(err: CoreError, context: &'static str) -> Self {
        match err {
            CoreError::NotFound => Self::SubscriptionNotFound,
            CoreError::AlreadyExists => Self::SubscriptionExists,
            CoreError::Validation(err) => Self::Validation(err),
            CoreError::ConstraintViolation(detail) => Self::ConstraintViolation(detail),
            source @ CoreError::Storage(_) => Self::Internal { context, source },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SubscriptionNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::SubscriptionExists => StatusCode::CONFLICT,
            Self::Validation(_) | Self::BadRequest(_) | Self::ConstraintViolation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Internal { .. } | Self::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Internal { source, .. } => {
                tracing::error!(error = %self, source = %source, "Internal API error");
            }
            Self::ConstraintViolation(detail) => {
                tracing::info!(detail = %detail, "Storage constraint rejected request");
            }
            Self::Timeout => tracing::warn!("Request timed out"),
            Self::Unexpected => {}
            _ => tracing::info!(error = %self, "Request rejected"),
        }

        let body = ErrorResponse {
            status: "Error",
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Map an error raised by the middleware stack (`HandleErrorLayer`)
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::Unexpected
    }
}

/// Response for a handler panic caught by `CatchPanicLayer`
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = detail, "Handler panicked");

    ApiError::Unexpected.into_response()
}
