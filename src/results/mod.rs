//! Materialised rows returned by prepared statements.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::CustomDbRow;
