//! Mock repositories for testing

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use subtrack_db::{DbError, DbResult, SubscriptionRepository};
use subtrack_types::{
    NewSubscription, Pagination, Subscription, SubscriptionFilter, SubscriptionId,
    SubscriptionUpdate, ValidationError,
};

/// In-memory subscription repository for testing.
///
/// Mirrors the storage constraints: unique (service name, user id) and end
/// strictly after start.
#[derive(Default, Clone)]
pub struct MockSubscriptionRepository {
    subs: Arc<DashMap<i64, Subscription>>,
    next_id: Arc<AtomicI64>,
}

impl MockSubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored subscriptions
    #[allow(dead_code)]
    pub fn count(&self) -> usize {
        self.subs.len()
    }

    fn check(&self, candidate: &Subscription) -> DbResult<()> {
        if !candidate.end.is_after(&candidate.start) {
            return Err(DbError::ConstraintViolation {
                op: "mock",
                message: "end must be after start".to_string(),
            });
        }

        let duplicate = self.subs.iter().any(|entry| {
            let other = entry.value();
            other.id != candidate.id
                && other.service_name == candidate.service_name
                && other.user_id == candidate.user_id
        });
        if duplicate {
            return Err(DbError::AlreadyExists);
        }

        Ok(())
    }

    fn sorted(&self) -> Vec<Subscription> {
        let mut all: Vec<Subscription> = self.subs.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|s| s.id);
        all
    }
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn create(&self, spec: &NewSubscription) -> DbResult<SubscriptionId> {
        let id = SubscriptionId(self.next_id.load(Ordering::SeqCst) + 1);
        let sub = spec.clone().with_id(id);
        self.check(&sub)?;

        self.next_id.store(id.0, Ordering::SeqCst);
        self.subs.insert(id.0, sub);
        Ok(id)
    }

    async fn find_by_id(&self, id: SubscriptionId) -> DbResult<Subscription> {
        self.subs
            .get(&id.0)
            .map(|r| r.value().clone())
            .ok_or(DbError::NotFound)
    }

    async fn update(&self, id: SubscriptionId, update: &SubscriptionUpdate) -> DbResult<()> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        let mut sub = self.find_by_id(id).await?;
        if let Some(name) = &update.service_name {
            sub.service_name = name.clone();
        }
        if let Some(price) = update.price {
            sub.price = price;
        }
        if let Some(start) = update.start {
            sub.start = start;
        }
        if let Some(end) = update.end {
            sub.end = end;
        }
        self.check(&sub)?;

        self.subs.insert(id.0, sub);
        Ok(())
    }

    async fn delete(&self, id: SubscriptionId) -> DbResult<()> {
        self.subs.remove(&id.0).map(|_| ()).ok_or(DbError::NotFound)
    }

    async fn list(&self, limit: Option<i64>, offset: Option<i64>) -> DbResult<Vec<Subscription>> {
        let all = self.sorted();
        match Pagination::from_parts(limit, offset)? {
            Some(page) => Ok(all
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect()),
            None => Ok(all),
        }
    }

    async fn filter(&self, filter: &SubscriptionFilter) -> DbResult<Vec<Subscription>> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|sub| filter.matches(sub))
            .collect())
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}
