//! Subtrack Core - Subscription business logic
//!
//! Validation, CRUD orchestration and total-cost aggregation on top of the
//! storage repository.
//!
//! # Example
//!
//! ```rust,ignore
//! use subtrack_core::SubscriptionService;
//! use subtrack_db::{Storage, StorageBackend};
//!
//! let storage = Storage::open(&backend).await?;
//! let service = SubscriptionService::new(storage.subscriptions());
//!
//! let id = service.create(&input).await?;
//! let cost = service.total_cost(&query).await?;
//! ```

pub mod aggregate;
pub mod error;
pub mod service;

pub use aggregate::{subscription_cost, total_cost, TotalCost};
pub use error::{CoreError, CoreResult};
pub use service::SubscriptionService;
