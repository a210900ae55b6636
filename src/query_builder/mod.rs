//! Composition of quoted, parameterised INSERT / UPDATE / DELETE statements.
//!
//! Nothing here touches a driver: every function returns a [`QueryAndParams`] or an
//! `InvalidQuery` / `QueryRequirement` error.

use crate::error::SqlRouterError;
use crate::placeholders::count_placeholders;
use crate::types::RowValues;

mod dml;
mod insert;
mod values;
mod where_clause;

pub use dml::{compose_delete, compose_update};
pub use insert::{InsertOptions, compose_insert};
pub use values::{ColumnMap, ColumnValue, RawSql};
pub use where_clause::{Where, build_where};

/// A query and its parameters bundled together.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query, in placeholder order
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Number of `?` placeholders in `query`.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.query)
    }

    /// Reject statements whose placeholders and parameters disagree, which happens
    /// when a raw fragment carries its own `?`.
    pub(crate) fn balanced(self) -> Result<Self, SqlRouterError> {
        let placeholders = self.placeholder_count();
        if placeholders == self.params.len() {
            Ok(self)
        } else {
            Err(SqlRouterError::InvalidQuery(format!(
                "statement has {placeholders} placeholders but {} parameters",
                self.params.len()
            )))
        }
    }
}

/// Wrap an identifier in backticks, doubling any embedded backtick.
///
/// # Errors
/// `InvalidQuery` when the identifier is empty or blank.
pub fn quote_identifier(name: &str) -> Result<String, SqlRouterError> {
    if name.trim().is_empty() {
        return Err(SqlRouterError::InvalidQuery(
            "identifier cannot be empty".into(),
        ));
    }
    Ok(format!("`{}`", name.replace('`', "``")))
}

/// Quote a column name as a single identifier.
///
/// # Errors
/// `InvalidQuery` when the column name is empty.
pub fn quote_column(column: &str) -> Result<String, SqlRouterError> {
    quote_identifier(column)
}

/// Quote a table name; `schema.table` becomes `` `schema`.`table` ``.
///
/// # Errors
/// `InvalidQuery` when the name or any dotted segment is empty.
pub fn quote_table(table: &str) -> Result<String, SqlRouterError> {
    let parts = table
        .split('.')
        .map(quote_identifier)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join("."))
}

/// Render `` `col` = ? `` / `` `col` = <raw> `` pairs, collecting bound values.
pub(crate) fn assignments(
    data: &ColumnMap,
) -> Result<(Vec<String>, Vec<RowValues>), SqlRouterError> {
    let mut set = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());
    for (column, value) in data.iter() {
        let quoted = quote_column(column)?;
        match value {
            ColumnValue::Value(v) => {
                set.push(format!("{quoted} = ?"));
                params.push(v.clone());
            }
            ColumnValue::Raw(raw) => set.push(format!("{quoted} = {raw}")),
        }
    }
    Ok((set, params))
}
