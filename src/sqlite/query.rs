use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use crate::error::DriverError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns `DriverError` if the value cannot be read.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, DriverError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a row-returning statement and materialise every row.
///
/// # Errors
/// Returns `DriverError` if execution or value extraction fails.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, DriverError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let row_values = (0..col_count)
            .map(|i| extract_value(row, i))
            .collect::<Result<Vec<_>, _>>()?;
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
