//! Subscription service

use std::sync::Arc;

use subtrack_db::SubscriptionRepository;
use subtrack_types::{
    CreateSubscriptionInput, Subscription, SubscriptionId, TotalCostInput,
    UpdateSubscriptionInput,
};
use tracing::{debug, info};

use crate::aggregate::{total_cost, TotalCost};
use crate::error::CoreResult;

/// Subscription service.
///
/// Validates raw request fields, then delegates to the active repository.
/// Nothing is retried; storage outcomes are reported as they come.
#[derive(Clone)]
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    /// Create a new subscription service
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repo }
    }

    /// Validate and persist a new subscription
    pub async fn create(&self, input: &CreateSubscriptionInput) -> CoreResult<SubscriptionId> {
        let spec = input.validate()?;
        let id = self.repo.create(&spec).await?;

        info!(
            id = %id,
            user_id = %spec.user_id,
            service_name = %spec.service_name,
            "Subscription created"
        );
        Ok(id)
    }

    /// Get a subscription by ID
    pub async fn get(&self, id: SubscriptionId) -> CoreResult<Subscription> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Validate and apply a partial update
    pub async fn update(
        &self,
        id: SubscriptionId,
        input: &UpdateSubscriptionInput,
    ) -> CoreResult<()> {
        let update = input.validate()?;
        self.repo.update(id, &update).await?;

        info!(id = %id, "Subscription updated");
        Ok(())
    }

    /// Delete a subscription
    pub async fn delete(&self, id: SubscriptionId) -> CoreResult<()> {
        self.repo.delete(id).await?;

        info!(id = %id, "Subscription deleted");
        Ok(())
    }

    /// List subscriptions, optionally paged
    pub async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> CoreResult<Vec<Subscription>> {
        Ok(self.repo.list(limit, offset).await?)
    }

    /// Total cost of subscriptions matching the window and filters
    pub async fn total_cost(&self, input: &TotalCostInput) -> CoreResult<TotalCost> {
        let filter = input.validate()?;
        let matching = self.repo.filter(&filter).await?;
        let cost = total_cost(&matching);

        debug!(
            start = %filter.start,
            end = %filter.end,
            matched = cost.count,
            total = cost.total,
            "Total cost calculated"
        );
        Ok(cost)
    }

    /// Check storage is reachable
    pub async fn ping(&self) -> CoreResult<()> {
        Ok(self.repo.ping().await?)
    }
}
