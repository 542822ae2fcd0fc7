//! Shared types for the staff management system
//!
//! Data models and small pure utilities used by both the server and
//! any API client. Kept dependency-light; the `db` feature adds sqlx
//! row derives for server-side use.

pub mod models;
pub mod util;
