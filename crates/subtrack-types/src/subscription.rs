//! Subscription types

use serde::{Deserialize, Serialize};

use crate::{Period, UserId};

/// Storage-assigned subscription identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub i64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SubscriptionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for SubscriptionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A persisted subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub service_name: String,
    /// Monthly price
    pub price: i32,
    pub user_id: UserId,
    pub start: Period,
    pub end: Period,
}

impl Subscription {
    /// Number of billed months between start and end
    pub fn active_months(&self) -> u32 {
        Period::months_between(&self.start, &self.end)
    }
}

/// Fields needed to create a subscription, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i32,
    pub user_id: UserId,
    pub start: Period,
    pub end: Period,
}

impl NewSubscription {
    /// Attach the storage-assigned id
    pub fn with_id(self, id: SubscriptionId) -> Subscription {
        Subscription {
            id,
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start: self.start,
            end: self.end,
        }
    }
}

/// Partial update of a subscription. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    pub service_name: Option<String>,
    pub price: Option<i32>,
    pub start: Option<Period>,
    pub end: Option<Period>,
}

impl SubscriptionUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.service_name.is_none()
            && self.price.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }
}

/// Criteria for selecting subscriptions by period window and attributes.
///
/// Bounds are exclusive: a subscription matches when its start is strictly
/// after `start` and its end is strictly before `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub start: Period,
    pub end: Period,
    pub user_id: Option<UserId>,
    pub service_name: Option<String>,
}

impl SubscriptionFilter {
    /// Filter on the window only
    pub fn window(start: Period, end: Period) -> Self {
        Self {
            start,
            end,
            user_id: None,
            service_name: None,
        }
    }

    /// Narrow to one user
    #[must_use]
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Narrow to one service name (exact match)
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// In-process equivalent of the storage predicate
    pub fn matches(&self, sub: &Subscription) -> bool {
        sub.start.is_after(&self.start)
            && self.end.is_after(&sub.end)
            && self.user_id.map_or(true, |u| u == sub.user_id)
            && self
                .service_name
                .as_deref()
                .map_or(true, |s| s == sub.service_name)
    }
}
