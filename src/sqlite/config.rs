use serde::{Deserialize, Serialize};

use crate::error::SqlRouterError;

use super::provider::SqliteProvider;

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Options for a `SQLite`-backed primary/replica pair.
///
/// With no `replica_path` the replica shares the primary connection, which is the only
/// way an in-memory database is visible from both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    #[serde(default)]
    pub replica_path: Option<String>,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Batch run on every freshly opened connection, e.g. `PRAGMA` settings.
    #[serde(default)]
    pub init_sql: Option<String>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            replica_path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            init_sql: None,
        }
    }

    /// Parse options from JSON.
    ///
    /// ```rust
    /// use sql_router::prelude::*;
    ///
    /// let opts = SqliteOptions::from_json(r#"{"db_path": "app.db", "replica_path": "replica.db"}"#).unwrap();
    /// assert_eq!(opts.busy_timeout_ms, 5000);
    /// ```
    ///
    /// # Errors
    /// `ConfigError` for malformed JSON or an empty `db_path`.
    pub fn from_json(json: &str) -> Result<Self, SqlRouterError> {
        let opts: SqliteOptions = serde_json::from_str(json)?;
        opts.validate()?;
        Ok(opts)
    }

    /// # Errors
    /// `ConfigError` when a path is empty.
    pub fn validate(&self) -> Result<(), SqlRouterError> {
        if self.db_path.trim().is_empty() {
            return Err(SqlRouterError::ConfigError("db_path cannot be empty".into()));
        }
        if self.replica_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(SqlRouterError::ConfigError(
                "replica_path cannot be empty when set".into(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn replica(mut self, replica_path: String) -> Self {
        self.opts.replica_path = Some(replica_path);
        self
    }

    #[must_use]
    pub fn busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.opts.busy_timeout_ms = busy_timeout_ms;
        self
    }

    #[must_use]
    pub fn init_sql(mut self, init_sql: impl Into<String>) -> Self {
        self.opts.init_sql = Some(init_sql.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Validate the options and open the primary as a smoke test.
    ///
    /// # Errors
    /// `ConfigError` for invalid options, `ConnectionError` if the primary cannot be opened.
    pub fn build(self) -> Result<SqliteProvider, SqlRouterError> {
        SqliteProvider::connect(self.finish())
    }
}
