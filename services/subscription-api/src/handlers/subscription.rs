//! Subscription CRUD handlers

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use subtrack_types::{CreateSubscriptionInput, Subscription, UpdateSubscriptionInput};
use tracing::instrument;

use super::shared::{ok, parse_body, parse_id, record_op_duration, Empty};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    /// MM-YYYY
    pub start_date: String,
    /// MM-YYYY; one month after start when absent
    pub end_date: Option<String>,
}

impl From<CreateRequest> for CreateSubscriptionInput {
    fn from(req: CreateRequest) -> Self {
        Self {
            service_name: req.service_name,
            price: req.price,
            user_id: req.user_id,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<UpdateRequest> for UpdateSubscriptionInput {
    fn from(req: UpdateRequest) -> Self {
        Self {
            service_name: req.service_name,
            price: req.price,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id.0,
            service_name: sub.service_name,
            price: sub.price,
            user_id: sub.user_id.to_string(),
            start_date: sub.start.to_compact_string(),
            end_date: sub.end.to_compact_string(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /subscription
#[instrument(skip(state, body))]
pub async fn create_subscription(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Response> {
    let start = Instant::now();

    let req: CreateRequest = parse_body(&body)?;
    let result = state.subscriptions.create(&req.into()).await;
    record_op_duration("create_subscription", start, result.is_ok());

    let id = result.map_err(|e| ApiError::from_core(e, "failed to create subscription"))?;

    Ok(ok(StatusCode::CREATED, CreateResponse { id: id.0 }))
}

/// GET /subscription/{id}
#[instrument(skip(state))]
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let start = Instant::now();

    let id = parse_id(&id)?;
    let result = state.subscriptions.get(id).await;
    record_op_duration("get_subscription", start, result.is_ok());

    let sub = result.map_err(|e| ApiError::from_core(e, "failed to get subscription"))?;

    Ok(ok(StatusCode::OK, SubscriptionResponse::from(sub)))
}

/// PATCH /subscription/{id}
#[instrument(skip(state, body))]
pub async fn update_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let start = Instant::now();

    let id = parse_id(&id)?;
    let req: UpdateRequest = parse_body(&body)?;
    let result = state.subscriptions.update(id, &req.into()).await;
    record_op_duration("update_subscription", start, result.is_ok());

    result.map_err(|e| ApiError::from_core(e, "failed to update subscription"))?;

    Ok(ok(StatusCode::OK, Empty {}))
}

/// DELETE /subscription/{id}
#[instrument(skip(state))]
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let start = Instant::now();

    let id = parse_id(&id)?;
    let result = state.subscriptions.delete(id).await;
    record_op_duration("delete_subscription", start, result.is_ok());

    result.map_err(|e| ApiError::from_core(e, "failed to delete subscription"))?;

    Ok(ok(StatusCode::OK, Empty {}))
}
