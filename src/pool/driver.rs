use crate::error::DriverError;
use crate::results::ResultSet;
use crate::types::{ParamType, RowValues};

/// A live connection to one endpoint.
pub trait DriverHandle {
    type Statement: PreparedStatement;

    /// Parse `sql` into a statement ready for execution.
    ///
    /// # Errors
    /// Returns `DriverError` if the statement cannot be prepared.
    fn prepare(&self, sql: &str) -> Result<Self::Statement, DriverError>;

    /// Auto-increment value from the most recent insert on this connection.
    ///
    /// `None`, `""` and `"0"` all mean "no meaningful id".
    ///
    /// # Errors
    /// Returns `DriverError` if the driver cannot report the value.
    fn last_insert_id(&self) -> Result<Option<String>, DriverError>;

    /// # Errors
    /// Returns `DriverError` if the driver rejects the command.
    fn begin_transaction(&self) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the driver rejects the command.
    fn commit(&self) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the driver rejects the command.
    fn roll_back(&self) -> Result<(), DriverError>;

    /// Driver-native literal quoting, for diagnostics only.
    ///
    /// # Errors
    /// Returns `DriverError` if the value cannot be quoted as `param_type`.
    fn quote(&self, value: &RowValues, param_type: ParamType) -> Result<String, DriverError>;
}

/// A statement prepared on a [`DriverHandle`].
pub trait PreparedStatement {
    /// Bind `params` positionally and run the statement.
    ///
    /// # Errors
    /// Returns `DriverError` on any execution failure.
    fn execute(&mut self, params: &[RowValues]) -> Result<(), DriverError>;

    /// Rows affected by the last execution.
    fn row_count(&self) -> usize;

    /// Rows produced by the last execution.
    ///
    /// # Errors
    /// Returns `DriverError` if the statement has not produced a result.
    fn fetch_all(&mut self) -> Result<ResultSet, DriverError>;

    /// The SQL this statement was prepared from.
    fn sql(&self) -> &str;
}
