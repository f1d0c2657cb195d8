//! SQLite persistence for work sessions and their event logs.
//!
//! Sessions are mutable rows; event logs are append-only. Every derived
//! number lives upstream in `worktrace-engine` — nothing computed from
//! events is ever written back here.

mod db;
mod error;
mod queries;
mod records;
mod schema;
mod util;

pub use db::Database;
pub use error::{Error, Result};
pub use records::{ProjectRecord, TaskRecord};
