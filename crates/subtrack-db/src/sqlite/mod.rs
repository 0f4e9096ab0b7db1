//! SQLite repository implementations

mod subscription;

pub use subscription::SqliteSubscriptionRepository;
