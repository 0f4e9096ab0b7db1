//! PostgreSQL subscription repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use subtrack_types::{
    NewSubscription, Subscription, SubscriptionFilter, SubscriptionId, SubscriptionUpdate,
    ValidationError,
};

use crate::error::{sqlx_err, DbError, DbResult};
use crate::models::{decode_rows, SubscriptionRow};
use crate::repo::{page, SubscriptionRepository};

// Dates come back as ISO text; ids are widened for SERIAL and BIGSERIAL alike
const SELECT_SUBSCRIPTIONS: &str = r#"
    SELECT id::BIGINT AS id, service_name, price, user_id,
           start_date::text AS start_date, end_date::text AS end_date
    FROM subscription
"#;

// Window bounds are bound as plain (year, month) integers, so a window
// period outside the DATE range never reaches the date parser
const START_PERIOD: &str =
    "(EXTRACT(YEAR FROM start_date)::int, EXTRACT(MONTH FROM start_date)::int)";
const END_PERIOD: &str = "(EXTRACT(YEAR FROM end_date)::int, EXTRACT(MONTH FROM end_date)::int)";

/// PostgreSQL subscription repository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, spec: &NewSubscription) -> DbResult<SubscriptionId> {
        const OP: &str = "storage.postgres.create";

        let mut tx = self.pool.begin().await.map_err(sqlx_err(OP))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subscription (service_name, price, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4::date, $5::date)
            RETURNING id::BIGINT
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
        const OP: &str = "storage.postgres.find_by_id";

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_SUBSCRIPTIONS);
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
        const OP: &str = "storage.postgres.update";

        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE subscription SET ");
        let mut set = qb.separated(", ");
        if let Some(name) = &update.service_name {
            set.push("service_name = ").push_bind_unseparated(name.clone());
        }
        if let Some(price) = update.price {
            set.push("price = ").push_bind_unseparated(price);
        }
        if let Some(start) = update.start {
            set.push("start_date = ")
                .push_bind_unseparated(start.to_iso_string())
                .push_unseparated("::date");
        }
        if let Some(end) = update.end {
            set.push("end_date = ")
                .push_bind_unseparated(end.to_iso_string())
                .push_unseparated("::date");
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
        const OP: &str = "storage.postgres.delete";

        let mut tx = self.pool.begin().await.map_err(sqlx_err(OP))?;

        let result = sqlx::query("DELETE FROM subscription WHERE id = $1")
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
        const OP: &str = "storage.postgres.list";

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_SUBSCRIPTIONS);
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
        const OP: &str = "storage.postgres.filter";

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_SUBSCRIPTIONS);
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
            .map_err(sqlx_err("storage.postgres.ping"))?;
        Ok(())
    }
}
