use crate::error::SqlRouterError;
use crate::types::RowValues;

use super::quote_column;

/// WHERE clause accepted by `update` and `delete`.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// Used verbatim after `WHERE `.
    Raw(String),
    /// Raw fragments joined with ` AND `.
    All(Vec<String>),
    /// `` `col` = ? `` per entry, joined with ` AND `; values are bound in order.
    Eq(Vec<(String, RowValues)>),
}

impl Where {
    pub fn raw(sql: impl Into<String>) -> Self {
        Where::Raw(sql.into())
    }

    pub fn all<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Where::All(fragments.into_iter().map(Into::into).collect())
    }

    pub fn eq<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        Where::Eq(
            pairs
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }

    /// An empty clause means "no condition", which `update`/`delete` refuse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Where::Raw(sql) => sql.trim().is_empty(),
            Where::All(fragments) => fragments.is_empty(),
            Where::Eq(pairs) => pairs.is_empty(),
        }
    }
}

impl From<&str> for Where {
    fn from(sql: &str) -> Self {
        Where::Raw(sql.to_owned())
    }
}

impl From<String> for Where {
    fn from(sql: String) -> Self {
        Where::Raw(sql)
    }
}

impl From<Vec<String>> for Where {
    fn from(fragments: Vec<String>) -> Self {
        Where::All(fragments)
    }
}

impl From<Vec<&str>> for Where {
    fn from(fragments: Vec<&str>) -> Self {
        Where::all(fragments)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Where
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Where::eq(pairs)
    }
}

/// Render a WHERE clause, returning `"WHERE ..."` and the values it binds.
///
/// # Errors
/// `QueryRequirement` for an empty clause; `InvalidQuery` for a blank fragment or an
/// invalid column name.
pub fn build_where(clause: &Where) -> Result<(String, Vec<RowValues>), SqlRouterError> {
    if clause.is_empty() {
        return Err(SqlRouterError::QueryRequirement(
            "WHERE clause is required".into(),
        ));
    }

    match clause {
        Where::Raw(sql) => Ok((format!("WHERE {sql}"), Vec::new())),
        Where::All(fragments) => {
            if fragments.iter().any(|fragment| fragment.trim().is_empty()) {
                return Err(SqlRouterError::InvalidQuery(
                    "WHERE fragments cannot be blank".into(),
                ));
            }
            Ok((format!("WHERE {}", fragments.join(" AND ")), Vec::new()))
        }
        Where::Eq(pairs) => {
            let mut conditions = Vec::with_capacity(pairs.len());
            let mut values = Vec::with_capacity(pairs.len());
            for (column, value) in pairs {
                conditions.push(format!("{} = ?", quote_column(column)?));
                values.push(value.clone());
            }
            Ok((format!("WHERE {}", conditions.join(" AND ")), values))
        }
    }
}
