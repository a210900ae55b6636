use std::rc::Rc;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{DriverError, SqlRouterError};
use crate::pool::ConnectionProvider;

use super::config::{SqliteOptions, SqliteOptionsBuilder};
use super::handle::{SqliteConnection, SqliteHandle};

/// Lazily opens and caches one connection per endpoint.
///
/// The replica is opened read-only when it has its own path; otherwise it shares the
/// primary connection. Connections are reference counted, so a handle handed out before
/// a reconnect keeps its old connection alive until dropped.
#[derive(Debug)]
pub struct SqliteProvider {
    options: SqliteOptions,
    primary: Option<Rc<SqliteConnection>>,
    replica: Option<Rc<SqliteConnection>>,
}

impl SqliteProvider {
    #[must_use]
    pub fn new(options: SqliteOptions) -> Self {
        Self {
            options,
            primary: None,
            replica: None,
        }
    }

    #[must_use]
    pub fn builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Validate `options` and open the primary eagerly.
    ///
    /// # Errors
    /// `ConfigError` for invalid options, `ConnectionError` if the primary cannot be opened.
    pub fn connect(options: SqliteOptions) -> Result<Self, SqlRouterError> {
        options.validate()?;
        let mut provider = Self::new(options);
        provider.primary().map_err(|e| {
            SqlRouterError::ConnectionError(format!("failed to open SQLite primary: {e}"))
        })?;
        Ok(provider)
    }

    /// Number of distinct connections currently cached.
    #[must_use]
    pub fn opened_connections(&self) -> usize {
        usize::from(self.primary.is_some()) + usize::from(self.replica.is_some())
    }
}

fn open(options: &SqliteOptions, path: &str, read_only: bool) -> Result<Connection, DriverError> {
    let conn = if read_only {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )?
    } else {
        Connection::open(path)?
    };
    conn.busy_timeout(Duration::from_millis(options.busy_timeout_ms))?;
    if let Some(init_sql) = &options.init_sql {
        conn.execute_batch(init_sql)?;
    }
    debug!(path, read_only, "opened SQLite connection");
    Ok(conn)
}

fn cached(
    slot: &mut Option<Rc<SqliteConnection>>,
    options: &SqliteOptions,
    path: &str,
    read_only: bool,
) -> Result<Rc<SqliteConnection>, DriverError> {
    if let Some(conn) = slot {
        return Ok(Rc::clone(conn));
    }
    let conn = Rc::new(SqliteConnection::new(open(options, path, read_only)?));
    *slot = Some(Rc::clone(&conn));
    Ok(conn)
}

impl ConnectionProvider for SqliteProvider {
    type Handle = SqliteHandle;

    fn primary(&mut self) -> Result<SqliteHandle, DriverError> {
        let conn = cached(&mut self.primary, &self.options, &self.options.db_path, false)?;
        Ok(SqliteHandle::new(conn))
    }

    fn replica(&mut self) -> Result<SqliteHandle, DriverError> {
        let Some(path) = self.options.replica_path.clone() else {
            return self.primary();
        };
        let conn = cached(&mut self.replica, &self.options, &path, true)?;
        Ok(SqliteHandle::new(conn))
    }

    fn reconnect(&mut self) -> Result<(), DriverError> {
        debug!("dropping cached SQLite connections for reconnect");
        self.primary = None;
        self.replica = None;
        Ok(())
    }

    fn close_opened_connections(&mut self) {
        self.primary = None;
        self.replica = None;
    }
}
