//! Data models
//!
//! Shared between staff-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all instants `i64` Unix millis.

pub mod attendance;
pub mod auth;
pub mod notification;
pub mod profile;
pub mod salary;

// Re-exports
pub use attendance::*;
pub use auth::*;
pub use notification::*;
pub use profile::*;
pub use salary::*;
