//! Database connection pools
//!
//! Opens the configured backend and hands out the repository behind a trait
//! object, so callers never see which database is active.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::pg::PgSubscriptionRepository;
use crate::repo::SubscriptionRepository;
use crate::sqlite::SqliteSubscriptionRepository;

/// PostgreSQL connection settings
#[derive(Clone)]
pub struct PgSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    /// Total connection attempts before giving up
    pub connect_attempts: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl std::fmt::Debug for PgSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("max_connections", &self.max_connections)
            .field("connect_attempts", &self.connect_attempts)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl PgSettings {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Which backend to open
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Postgres(PgSettings),
    Sqlite { path: PathBuf },
}

/// Open a PostgreSQL pool, retrying with a fixed delay.
///
/// Fails with [`DbError::ConnectExhausted`] once every attempt has failed.
pub async fn connect_postgres(settings: &PgSettings) -> DbResult<PgPool> {
    let max_attempts = settings.connect_attempts.max(1);
    let options = settings.connect_options();

    let mut attempt = 1;
    loop {
        let result = PgPoolOptions::new()
            .max_connections(settings.max_connections.max(1))
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => {
                info!(
                    host = %settings.host,
                    port = settings.port,
                    database = %settings.database,
                    attempt,
                    "Connected to PostgreSQL"
                );
                return Ok(pool);
            }
            Err(err) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    delay_secs = settings.retry_delay.as_secs(),
                    error = %err,
                    "PostgreSQL connection failed, retrying"
                );
                tokio::time::sleep(settings.retry_delay).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(DbError::ConnectExhausted {
                    attempts: attempt,
                    source: err,
                })
            }
        }
    }
}

/// Open (creating if missing) a SQLite database file
pub async fn connect_sqlite(path: &std::path::Path) -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    // One connection: SQLite serialises writers anyway
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|source| DbError::Sqlx {
            op: "storage.sqlite.connect",
            source,
        })?;

    info!(path = %path.display(), "Opened SQLite database");
    Ok(pool)
}

#[derive(Clone)]
enum Pool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// The active storage backend
#[derive(Clone)]
pub struct Storage {
    pool: Pool,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl Storage {
    /// Connect to the configured backend
    pub async fn open(backend: &StorageBackend) -> DbResult<Self> {
        match backend {
            StorageBackend::Postgres(settings) => {
                Ok(Self::from_pg_pool(connect_postgres(settings).await?))
            }
            StorageBackend::Sqlite { path } => {
                Ok(Self::from_sqlite_pool(connect_sqlite(path).await?))
            }
        }
    }

    /// Wrap an existing PostgreSQL pool
    pub fn from_pg_pool(pool: PgPool) -> Self {
        Self {
            subscriptions: Arc::new(PgSubscriptionRepository::new(pool.clone())),
            pool: Pool::Postgres(pool),
        }
    }

    /// Wrap an existing SQLite pool
    pub fn from_sqlite_pool(pool: SqlitePool) -> Self {
        Self {
            subscriptions: Arc::new(SqliteSubscriptionRepository::new(pool.clone())),
            pool: Pool::Sqlite(pool),
        }
    }

    /// Subscription repository for the active backend
    pub fn subscriptions(&self) -> Arc<dyn SubscriptionRepository> {
        Arc::clone(&self.subscriptions)
    }

    /// Backend name for logs
    pub fn backend_name(&self) -> &'static str {
        match self.pool {
            Pool::Postgres(_) => "postgres",
            Pool::Sqlite(_) => "sqlite",
        }
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        match &self.pool {
            Pool::Postgres(pool) => pool.close().await,
            Pool::Sqlite(pool) => pool.close().await,
        }
    }
}
