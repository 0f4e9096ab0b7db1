//! Subtrack DB - Database abstractions
//!
//! SQLx-based storage for subscriptions, with interchangeable PostgreSQL and
//! SQLite backends behind one repository trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use subtrack_db::{Storage, StorageBackend};
//!
//! let storage = Storage::open(&StorageBackend::Sqlite { path: "storage.db".into() }).await?;
//! let repo = storage.subscriptions();
//!
//! let sub = repo.find_by_id(SubscriptionId(1)).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;
pub mod sqlite;

pub use error::{DbError, DbResult};
pub use models::SubscriptionRow;
pub use pg::PgSubscriptionRepository;
pub use pool::{connect_postgres, connect_sqlite, PgSettings, Storage, StorageBackend};
pub use repo::SubscriptionRepository;
pub use sqlite::SqliteSubscriptionRepository;
