use crate::error::SqlRouterError;

use super::{ColumnMap, QueryAndParams, Where, assignments, build_where, quote_table};

/// Compose `` UPDATE `table` SET ... WHERE ... ``.
///
/// Parameters are the SET values followed by the WHERE values.
///
/// # Errors
/// `QueryRequirement` for an empty WHERE (checked first), `InvalidQuery` for empty data
/// or a malformed WHERE.
pub fn compose_update(
    table: &str,
    data: &ColumnMap,
    condition: &Where,
) -> Result<QueryAndParams, SqlRouterError> {
    if condition.is_empty() {
        return Err(SqlRouterError::QueryRequirement(
            "WHERE required for update".into(),
        ));
    }
    if data.is_empty() {
        return Err(SqlRouterError::InvalidQuery("no data for update".into()));
    }

    let (set, mut params) = assignments(data)?;
    let (where_sql, where_params) = build_where(condition)?;
    params.extend(where_params);

    let sql = format!(
        "UPDATE {} SET {} {where_sql}",
        quote_table(table)?,
        set.join(", ")
    );
    QueryAndParams::new(sql, params).balanced()
}

/// Compose `` DELETE FROM `table` WHERE ... ``.
///
/// # Errors
/// `QueryRequirement` for an empty WHERE, `InvalidQuery` for a malformed one.
pub fn compose_delete(table: &str, condition: &Where) -> Result<QueryAndParams, SqlRouterError> {
    if condition.is_empty() {
        return Err(SqlRouterError::QueryRequirement(
            "WHERE required for delete".into(),
        ));
    }

    let (where_sql, params) = build_where(condition)?;
    let sql = format!("DELETE FROM {} {where_sql}", quote_table(table)?);
    QueryAndParams::new(sql, params).balanced()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::RawSql;
    use crate::types::RowValues;

    #[test]
    fn update_orders_set_values_before_where_values() {
        let data = ColumnMap::new()
            .with("ghi", 789)
            .with("modified_on", RawSql::new("NOW()"))
            .with("created_on", 0);
        let composed = compose_update("my_table", &data, &[("id", 5)].into()).unwrap();
        assert_eq!(
            composed.query,
            "UPDATE `my_table` SET `ghi` = ?, `modified_on` = NOW(), `created_on` = ? WHERE `id` = ?"
        );
        assert_eq!(
            composed.params,
            vec![RowValues::Int(789), RowValues::Int(0), RowValues::Int(5)]
        );
    }

    #[test]
    fn update_checks_where_before_data() {
        let err = compose_update("abc", &ColumnMap::new(), &"".into()).unwrap_err();
        assert!(err.is_query_requirement());

        let err = compose_update("abc", &ColumnMap::new(), &"abc=1".into()).unwrap_err();
        assert!(err.is_invalid_query());
    }

    #[test]
    fn delete_with_raw_where() {
        let composed = compose_delete("app.my_table", &"id=1".into()).unwrap();
        assert_eq!(composed.query, "DELETE FROM `app`.`my_table` WHERE id=1");
        assert!(composed.params.is_empty());
    }
}
