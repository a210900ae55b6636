//! `rusqlite` implementation of the provider and driver seams.
//!
//! `SQLite` accepts backtick-quoted identifiers, so INSERT/UPDATE/DELETE composed by
//! this crate run unchanged. `INSERT IGNORE` and `ON DUPLICATE KEY UPDATE` are MySQL
//! syntax and are rejected by `SQLite` at prepare time.

pub mod config;
mod handle;
pub mod params;
mod provider;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use handle::{SqliteHandle, SqliteStatement};
pub use provider::SqliteProvider;
