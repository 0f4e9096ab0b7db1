//! SQLite subscription repository implementation

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use subtrack_types::{
    NewSubscription, Subscription, SubscriptionFilter, SubscriptionId, SubscriptionUpdate,
    ValidationError,
};

use crate::error::{sqlx_err, DbError, DbResult};
use crate::models::{decode_rows, SubscriptionRow};
use crate::repo::{page, SubscriptionRepository};

// Periods are stored as ISO text
const SELECT_SUBSCRIPTIONS: &str = r#"
    SELECT id, service_name, price, user_id, start_date, end_date
    FROM subscription
"#;

// Window bounds are compared as (year, month) integers. Text order only
// holds for four-digit years, and a window may reach past them.
const START_PERIOD: &str = "(CAST(substr(start_date, 1, 4) AS INTEGER), \
                             CAST(substr(start_date, 6, 2) AS INTEGER))";
const END_PERIOD: &str = "(CAST(substr(end_date, 1, 4) AS INTEGER), \
                           CAST(substr(end_date, 6, 2) AS INTEGER))";

/// SQLite subscription repository
#[derive(Clone)]
pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn create(&self, spec: &NewSubscription) -> DbResult<SubscriptionId> {
        const OP: &str = "storage.sqlite.create";

        let mut tx = self.pool.begin().await.map_err(sqlx_err(OP))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subscription (service_name, price, user_id, start_date, end_date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&spec.service_name)
        .bind(spec.price)
        .bind(spec.user_id.to_string())
        .bind(spec.start.to_iso_string())
        .bind(spec.end.to_iso_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(sqlx_err(OP))?;

        tx.commit().await.map_err(sqlx_err(OP))?;

        Ok(SubscriptionId(id))
    }

    async fn find_by_id(&self, id: SubscriptionId) -> DbResult<Subscription> {
        const OP: &str = "storage.sqlite.find_by_id";

        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_SUBSCRIPTIONS);
        qb.push(" WHERE id = ").push_bind(id.0);

        let row = qb
            .build_query_as::<SubscriptionRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_err(OP))?
            .ok_or(DbError::NotFound)?;

        row.into_subscription(OP)
    }

    async fn update(&self, id: SubscriptionId, update: &SubscriptionUpdate) -> DbResult<()> {
        const OP: &str = "storage.sqlite.update";

        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE subscription SET ");
        let mut set = qb.separated(", ");
        if let Some(name) = &update.service_name {
            set.push("service_name = ").push_bind_unseparated(name.clone());
        }
        if let Some(price) = update.price {
            set.push("price = ").push_bind_unseparated(price);
        }
        if let Some(start) = update.start {
            set.push("start_date = ").push_bind_unseparated(start.to_iso_string());
        }
        if let Some(end) = update.end {
            set.push("end_date = ").push_bind_unseparated(end.to_iso_string());
        }
        qb.push(" WHERE id = ").push_bind(id.0);

        let mut tx = self.pool.begin().await.map_err(sqlx_err(OP))?;

        let result = qb.build().execute(&mut *tx).await.map_err(sqlx_err(OP))?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        tx.commit().await.map_err(sqlx_err(OP))?;

        Ok(())
    }

    async fn delete(&self, id: SubscriptionId) -> DbResult<()> {
        const OP: &str = "storage.sqlite.delete";

        let mut tx = self.pool.begin().await.map_err(sqlx_err(OP))?;

        let result = sqlx::query("DELETE FROM subscription WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_err(OP))?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        tx.commit().await.map_err(sqlx_err(OP))?;

        Ok(())
    }

    async fn list(&self, limit: Option<i64>, offset: Option<i64>) -> DbResult<Vec<Subscription>> {
        const OP: &str = "storage.sqlite.list";

        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_SUBSCRIPTIONS);
        qb.push(" ORDER BY id");
        if let Some(page) = page(limit, offset)? {
            qb.push(" LIMIT ")
                .push_bind(page.limit)
                .push(" OFFSET ")
                .push_bind(page.offset);
        }

        let rows = qb
            .build_query_as::<SubscriptionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_err(OP))?;

        decode_rows(OP, rows)
    }

    async fn filter(&self, filter: &SubscriptionFilter) -> DbResult<Vec<Subscription>> {
        const OP: &str = "storage.sqlite.filter";

        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_SUBSCRIPTIONS);
        qb.push(" WHERE ")
            .push(START_PERIOD)
            .push(" > (")
            .push_bind(filter.start.year)
            .push(", ")
            .push_bind(filter.start.month)
            .push(") AND ")
            .push(END_PERIOD)
            .push(" < (")
            .push_bind(filter.end.year)
            .push(", ")
            .push_bind(filter.end.month)
            .push(")");
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.to_string());
        }
        if let Some(name) = &filter.service_name {
            qb.push(" AND service_name = ").push_bind(name.clone());
        }
        qb.push(" ORDER BY id");

        let rows = qb
            .build_query_as::<SubscriptionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_err(OP))?;

        decode_rows(OP, rows)
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(sqlx_err("storage.sqlite.ping"))?;
        Ok(())
    }
}
