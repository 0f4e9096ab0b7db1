//! PostgreSQL repository implementations

mod subscription;

pub use subscription::PgSubscriptionRepository;
