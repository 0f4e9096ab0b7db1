//! Subscription API
//!
//! REST service for managing user subscriptions.
//!
//! ## REST Endpoints
//!
//! - `POST /subscription` - Create a subscription
//! - `GET /subscription/{id}` - Read a subscription
//! - `PATCH /subscription/{id}` - Partially update a subscription
//! - `DELETE /subscription/{id}` - Delete a subscription
//! - `GET /subscriptions?limit=&offset=` - List subscriptions
//! - `GET /subscriptions/total-cost?start_date=&end_date=&user_id=&service_name=` -
//!   Total cost of matching subscriptions
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod state;

use axum::error_handling::HandleErrorLayer;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use config::{AppEnv, Config, ConfigError};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Build the HTTP router with all routes and middleware
pub fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    let api = Router::new()
        .route("/subscription", post(handlers::create_subscription))
        .route(
            "/subscription/{id}",
            get(handlers::get_subscription)
                .patch(handlers::update_subscription)
                .delete(handlers::delete_subscription),
        )
        .route("/subscriptions", get(handlers::list_subscriptions))
        .route("/subscriptions/total-cost", get(handlers::total_cost))
        .fallback(handlers::not_found);

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Turn handler panics into 500 envelopes
        .layer(CatchPanicLayer::custom(error::panic_response))
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler), answered as a 408 envelope
        .layer(HandleErrorLayer::new(error::handle_middleware_error))
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .merge(api)
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}
