use std::borrow::Cow;

use crate::error::SqlRouterError;
use crate::types::RowValues;

use super::{ColumnMap, ColumnValue, QueryAndParams, quote_column, quote_table};

/// Flags for [`compose_insert`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertOptions {
    /// Emit `INSERT IGNORE INTO`.
    pub ignore: bool,
    /// Append `ON DUPLICATE KEY UPDATE` with these assignments, emitted literally.
    pub on_duplicate: Option<ColumnMap>,
}

impl InsertOptions {
    #[must_use]
    pub fn ignore() -> Self {
        Self {
            ignore: true,
            on_duplicate: None,
        }
    }

    #[must_use]
    pub fn on_duplicate(update: ColumnMap) -> Self {
        Self {
            ignore: false,
            on_duplicate: Some(update),
        }
    }
}

/// Compose an INSERT statement.
///
/// ```rust
/// use sql_router::prelude::*;
///
/// let data = ColumnMap::new().with("abc", 123).with("def", 456);
/// let composed = compose_insert("my_table", &data, &InsertOptions::default()).unwrap();
/// assert_eq!(composed.query, "INSERT INTO `my_table` (`abc`, `def`) VALUES (?, ?)");
/// assert_eq!(composed.params, vec![RowValues::Int(123), RowValues::Int(456)]);
/// ```
///
/// # Errors
/// `InvalidQuery` for empty or non-associative data, a non-associative on-duplicate map,
/// or an on-duplicate value that has no SQL literal form.
pub fn compose_insert(
    table: &str,
    data: &ColumnMap,
    options: &InsertOptions,
) -> Result<QueryAndParams, SqlRouterError> {
    if data.is_empty() {
        return Err(SqlRouterError::InvalidQuery("no data for insert".into()));
    }

    let action = if options.ignore {
        "INSERT IGNORE INTO"
    } else {
        "INSERT INTO"
    };

    let mut columns = Vec::with_capacity(data.len());
    let mut positions = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());
    for (column, value) in data.iter() {
        columns.push(quote_column(column).map_err(|_| non_associative("insert data"))?);
        match value {
            ColumnValue::Value(v) => {
                positions.push(Cow::Borrowed("?"));
                params.push(v.clone());
            }
            ColumnValue::Raw(raw) => positions.push(Cow::Borrowed(raw.as_str())),
        }
    }

    let mut sql = format!(
        "{action} {} ({}) VALUES ({})",
        quote_table(table)?,
        columns.join(", "),
        positions.join(", ")
    );

    if let Some(update) = options.on_duplicate.as_ref().filter(|u| !u.is_empty()) {
        let mut update_values = Vec::with_capacity(update.len());
        for (column, value) in update.iter() {
            let column = quote_column(column).map_err(|_| non_associative("duplicate key clause"))?;
            update_values.push(format!("{column} = {}", literal(value)?));
        }
        sql.push_str(" ON DUPLICATE KEY UPDATE ");
        sql.push_str(&update_values.join(", "));
    }

    QueryAndParams::new(sql, params).balanced()
}

fn non_associative(what: &str) -> SqlRouterError {
    SqlRouterError::InvalidQuery(format!("{what} must map column names to values"))
}

/// Literal rendering used by `ON DUPLICATE KEY UPDATE`, where values are SQL expressions.
fn literal(value: &ColumnValue) -> Result<Cow<'_, str>, SqlRouterError> {
    let rendered = match value {
        ColumnValue::Raw(raw) => Cow::Borrowed(raw.as_str()),
        ColumnValue::Value(RowValues::Text(text)) => Cow::Borrowed(text.as_str()),
        ColumnValue::Value(RowValues::Int(i)) => Cow::Owned(i.to_string()),
        ColumnValue::Value(RowValues::Float(f)) if f.is_finite() => Cow::Owned(f.to_string()),
        ColumnValue::Value(RowValues::Bool(b)) => Cow::Borrowed(if *b { "1" } else { "0" }),
        ColumnValue::Value(RowValues::Null) => Cow::Borrowed("NULL"),
        ColumnValue::Value(other) => {
            return Err(SqlRouterError::InvalidQuery(format!(
                "{other:?} cannot be converted to an SQL expression"
            )));
        }
    };
    Ok(rendered)
}
