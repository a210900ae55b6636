//! Convenient imports for common functionality.

pub use crate::adapter::Adapter;
pub use crate::error::{DriverError, SqlRouterError};
pub use crate::events::{Dispatcher, QueryEvent, QueryEventName, QuerySubject};
pub use crate::insert_outcome::InsertOutcome;
pub use crate::pool::{ConnectionProvider, DriverHandle, PreparedStatement, StatementOf};
pub use crate::query_builder::{
    ColumnMap, ColumnValue, InsertOptions, QueryAndParams, RawSql, Where, compose_delete,
    compose_insert, compose_update,
};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::types::{Endpoint, ParamType, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder, SqliteProvider};
