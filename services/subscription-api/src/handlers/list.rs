//! Listing and aggregation handlers

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use subtrack_types::TotalCostInput;
use tracing::instrument;

use super::shared::{ok, parse_query_number, record_op_duration};
use super::subscription::SubscriptionResponse;
use crate::error::{ApiError, ApiResult};
use crate::extractors::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<SubscriptionResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TotalCostParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

impl From<TotalCostParams> for TotalCostInput {
    fn from(params: TotalCostParams) -> Self {
        Self {
            start_date: params.start_date,
            end_date: params.end_date,
            user_id: params.user_id,
            service_name: params.service_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotalCostResponse {
    pub total_cost: i64,
}

/// GET /subscriptions
///
/// `limit` and `offset` must be supplied together.
#[instrument(skip(state))]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Response> {
    let start = Instant::now();

    let limit = parse_query_number(params.limit.as_deref(), "invalid limit format")?;
    let offset = parse_query_number(params.offset.as_deref(), "invalid offset format")?;

    let result = state.subscriptions.list(limit, offset).await;
    record_op_duration("list_subscriptions", start, result.is_ok());

    let subs = result.map_err(|e| ApiError::from_core(e, "failed to get subscriptions"))?;

    let items = subs.into_iter().map(SubscriptionResponse::from).collect();
    Ok(ok(StatusCode::OK, ListResponse { items }))
}

/// GET /subscriptions/total-cost
#[instrument(skip(state))]
pub async fn total_cost(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TotalCostParams>,
) -> ApiResult<Response> {
    let start = Instant::now();

    let result = state.subscriptions.total_cost(&params.into()).await;
    record_op_duration("total_cost", start, result.is_ok());

    let cost = result.map_err(|e| ApiError::from_core(e, "failed to calculate total cost"))?;

    Ok(ok(
        StatusCode::OK,
        TotalCostResponse {
            total_cost: cost.total,
        },
    ))
}
