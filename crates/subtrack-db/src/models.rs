//! Database row models
//!
//! Both backends select the same column set, with periods rendered as ISO
//! text, so a single row type serves PostgreSQL and SQLite.

use sqlx::FromRow;
use subtrack_types::{Period, Subscription, SubscriptionId, UserId};

use crate::error::{DbError, DbResult};

/// Subscription row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: i64,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
}

impl SubscriptionRow {
    /// Decode the row into the domain model
    pub fn into_subscription(self, op: &'static str) -> DbResult<Subscription> {
        let user_id =
            UserId::parse(&self.user_id).map_err(|e| DbError::corrupt(op, "user_id", e))?;
        let start =
            Period::parse_iso(&self.start_date).map_err(|e| DbError::corrupt(op, "start_date", e))?;
        let end =
            Period::parse_iso(&self.end_date).map_err(|e| DbError::corrupt(op, "end_date", e))?;

        Ok(Subscription {
            id: SubscriptionId(self.id),
            service_name: self.service_name,
            price: self.price,
            user_id,
            start,
            end,
        })
    }
}

/// Decode a batch of rows, failing on the first corrupt one
pub(crate) fn decode_rows(
    op: &'static str,
    rows: Vec<SubscriptionRow>,
) -> DbResult<Vec<Subscription>> {
    rows.into_iter()
        .map(|row| row.into_subscription(op))
        .collect()
}
