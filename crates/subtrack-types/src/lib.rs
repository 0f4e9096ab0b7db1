//! Subtrack Types - Shared domain types
//!
//! This crate contains the domain model used across subtrack crates:
//! - Month-granularity [`Period`] values and their encodings
//! - Subscription records, updates and filters
//! - Request field validation

pub mod period;
pub mod subscription;
pub mod user;
pub mod validation;

pub use period::*;
pub use subscription::*;
pub use user::*;
pub use validation::*;
