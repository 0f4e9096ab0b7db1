//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use subtrack_types::{
    NewSubscription, Pagination, Subscription, SubscriptionFilter, SubscriptionId,
    SubscriptionUpdate,
};

use crate::error::DbResult;

/// Subscription repository trait.
///
/// Implemented once per backend. Every mutation runs in its own transaction
/// which is committed only after the affected-row check passes.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new subscription and return its assigned id
    async fn create(&self, spec: &NewSubscription) -> DbResult<SubscriptionId>;

    /// Find a subscription by ID
    async fn find_by_id(&self, id: SubscriptionId) -> DbResult<Subscription>;

    /// Apply a partial update
    async fn update(&self, id: SubscriptionId, update: &SubscriptionUpdate) -> DbResult<()>;

    /// Delete a subscription
    async fn delete(&self, id: SubscriptionId) -> DbResult<()>;

    /// List subscriptions ordered by id.
    ///
    /// `limit` and `offset` must be given together or not at all.
    async fn list(&self, limit: Option<i64>, offset: Option<i64>) -> DbResult<Vec<Subscription>>;

    /// Subscriptions strictly inside the filter window
    async fn filter(&self, filter: &SubscriptionFilter) -> DbResult<Vec<Subscription>>;

    /// Check the backend is reachable
    async fn ping(&self) -> DbResult<()>;
}

/// Validate the limit/offset pairing shared by every backend
pub(crate) fn page(limit: Option<i64>, offset: Option<i64>) -> DbResult<Option<Pagination>> {
    Ok(Pagination::from_parts(limit, offset)?)
}
