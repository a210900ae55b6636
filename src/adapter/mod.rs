//! The public facade over a primary/replica pair.

mod dml;
mod tx;

use std::fmt;

use tracing::info;

use crate::error::SqlRouterError;
use crate::events::{Dispatcher, QueryEvent, QueryEventName};
use crate::pool::{ConnectionProvider, DriverHandle, StatementOf};
use crate::types::{ParamType, RowValues};

/// Routes queries between a primary and a replica endpoint.
///
/// Writes always go to the primary. Reads go to the replica unless pinned to the
/// primary, and everything goes to the primary while a transaction is open.
///
/// An adapter is meant for one thread at a time: the transaction flag and the
/// provider's handles are per-connection state. Wrap it in a mutex to share it.
///
/// ```rust
/// # #[cfg(feature = "sqlite")]
/// # fn demo() -> Result<(), sql_router::SqlRouterError> {
/// use sql_router::prelude::*;
///
/// let provider = SqliteProvider::new(SqliteOptions::new(":memory:".into()));
/// let mut adapter = Adapter::new(provider);
/// adapter.query_primary("CREATE TABLE `t` (`id` INTEGER PRIMARY KEY, `name` TEXT)", &[])?;
///
/// let outcome = adapter.insert("t", &ColumnMap::new().with("name", "alice"), &InsertOptions::default())?;
/// assert_eq!(outcome, InsertOutcome::LastInsertId("1".into()));
/// # Ok(())
/// # }
/// # #[cfg(feature = "sqlite")]
/// # demo().unwrap();
/// ```
pub struct Adapter<P: ConnectionProvider> {
    pub(crate) connection: P,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) in_transaction: bool,
}

impl<P: ConnectionProvider> Adapter<P> {
    pub fn new(connection: P) -> Self {
        Self::with_dispatcher(connection, Dispatcher::new())
    }

    pub fn with_dispatcher(connection: P, dispatcher: Dispatcher) -> Self {
        Self {
            connection,
            dispatcher,
            in_transaction: false,
        }
    }

    /// Register a listener for `query_pre_execute` or `query_post_execute`.
    pub fn bind_event<F>(&mut self, name: QueryEventName, listener: F)
    where
        F: Fn(&QueryEvent<'_>) + 'static,
    {
        self.dispatcher.bind(name, listener);
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn connection(&self) -> &P {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut P {
        &mut self.connection
    }

    /// Run arbitrary SQL, on the replica unless `use_primary` is set.
    ///
    /// Returns the executed statement; rows are read with
    /// [`fetch_all`](crate::PreparedStatement::fetch_all).
    ///
    /// # Errors
    /// `QueryError` wrapping the driver failure after any permitted retry.
    pub fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
        use_primary: bool,
    ) -> Result<StatementOf<P>, SqlRouterError> {
        self.execute(sql, params, use_primary)
    }

    /// Run arbitrary SQL on the primary.
    ///
    /// # Errors
    /// `QueryError` wrapping the driver failure after any permitted retry.
    pub fn query_primary(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<StatementOf<P>, SqlRouterError> {
        self.execute(sql, params, true)
    }

    /// Quote `value` with the replica driver's native quoting.
    ///
    /// For diagnostics; statements built by this crate always bind values.
    ///
    /// # Errors
    /// `DriverError` if the replica is unavailable or refuses the value.
    pub fn quote(
        &mut self,
        value: &RowValues,
        param_type: ParamType,
    ) -> Result<String, SqlRouterError> {
        Ok(self.connection.replica()?.quote(value, param_type)?)
    }

    /// Close every pooled handle. Also ends transaction tracking: an open transaction
    /// does not survive its connection.
    pub fn close_connection(&mut self) {
        if self.in_transaction {
            info!("closing connections with a transaction still open");
        }
        self.in_transaction = false;
        self.connection.close_opened_connections();
    }
}

impl<P> fmt::Debug for Adapter<P>
where
    P: ConnectionProvider + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("connection", &self.connection)
            .field("dispatcher", &self.dispatcher)
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}
