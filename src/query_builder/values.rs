use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::types::RowValues;

/// SQL fragment spliced into a statement verbatim instead of being bound, e.g. `NOW()`.
///
/// Only construct these from trusted, application-owned text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawSql(String);

impl RawSql {
    pub fn new(sql: impl Into<String>) -> Self {
        RawSql(sql.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A column assignment: either a bindable value or a raw fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// Emitted as `?` and appended to the positional parameters.
    Value(RowValues),
    /// Spliced verbatim; contributes no placeholder and no parameter.
    Raw(RawSql),
}

impl ColumnValue {
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, ColumnValue::Raw(_))
    }
}

impl From<RawSql> for ColumnValue {
    fn from(raw: RawSql) -> Self {
        ColumnValue::Raw(raw)
    }
}

impl From<RowValues> for ColumnValue {
    fn from(value: RowValues) -> Self {
        ColumnValue::Value(value)
    }
}

macro_rules! column_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ColumnValue {
                fn from(value: $ty) -> Self {
                    ColumnValue::Value(RowValues::from(value))
                }
            }
        )*
    };
}

column_value_from!(i64, i32, u32, f64, bool, String, &str, NaiveDateTime, JsonValue, Vec<u8>);

/// Insertion-ordered column to value mapping.
///
/// Order is significant: it fixes both the column order in the emitted SQL and the
/// order of the positional parameters. Setting an existing column replaces its value
/// in place.
///
/// ```rust
/// use sql_router::prelude::*;
///
/// let data = ColumnMap::new()
///     .with("abc", 123)
///     .with("created_on", RawSql::new("NOW()"));
/// assert_eq!(data.columns().collect::<Vec<_>>(), ["abc", "created_on"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    entries: Vec<(String, ColumnValue)>,
}

impl ColumnMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<ColumnValue>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnMap
where
    K: Into<String>,
    V: Into<ColumnValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ColumnMap::new();
        for (column, value) in iter {
            map.set(column, value);
        }
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ColumnMap
where
    K: Into<String>,
    V: Into<ColumnValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
