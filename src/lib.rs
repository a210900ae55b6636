//! Primary/replica SQL access layer.
//!
//! An [`Adapter`] composes quoted, parameterised INSERT / UPDATE / DELETE statements,
//! routes every statement to the primary or the replica, tracks whether a transaction
//! is open, reconnects and retries once when the server has dropped a connection, and
//! reports every attempt through `query_pre_execute` / `query_post_execute` events.
//!
//! ```rust
//! use sql_router::prelude::*;
//!
//! let data = ColumnMap::new().with("abc", 123).with("created_on", RawSql::new("NOW()"));
//! let composed = compose_insert("my_table", &data, &InsertOptions::ignore()).unwrap();
//! assert_eq!(
//!     composed.query,
//!     "INSERT IGNORE INTO `my_table` (`abc`, `created_on`) VALUES (?, NOW())"
//! );
//! ```

pub mod adapter;
pub mod error;
pub mod events;
pub mod executor;
pub mod insert_outcome;
pub mod placeholders;
pub mod pool;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapter::Adapter;
pub use error::{DriverError, SqlRouterError};
pub use events::{Dispatcher, QueryEvent, QueryEventName, QuerySubject};
pub use executor::is_connection_gone;
pub use insert_outcome::InsertOutcome;
pub use placeholders::count_placeholders;
pub use pool::{ConnectionProvider, DriverHandle, PreparedStatement, StatementOf};
pub use query_builder::{
    ColumnMap, ColumnValue, InsertOptions, QueryAndParams, RawSql, Where, compose_delete,
    compose_insert, compose_update, quote_column, quote_identifier, quote_table,
};
pub use results::{CustomDbRow, ResultSet};
pub use types::{Endpoint, ParamType, RowValues};
