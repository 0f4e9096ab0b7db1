//! REST API handlers

pub mod health;
pub mod list;
pub mod shared;
pub mod subscription;

pub use health::*;
pub use list::*;
pub use subscription::*;
