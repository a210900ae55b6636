use crate::error::SqlRouterError;
use crate::insert_outcome::InsertOutcome;
use crate::pool::{ConnectionProvider, DriverHandle, PreparedStatement};
use crate::query_builder::{
    ColumnMap, InsertOptions, Where, compose_delete, compose_insert, compose_update,
};

use super::Adapter;

impl<P: ConnectionProvider> Adapter<P> {
    /// Insert one row on the primary.
    ///
    /// # Errors
    /// `InvalidQuery` for malformed data or on-duplicate values, `QueryError` if the
    /// statement fails, `DriverError` if the last-insert-id cannot be read.
    pub fn insert(
        &mut self,
        table: &str,
        data: &ColumnMap,
        options: &InsertOptions,
    ) -> Result<InsertOutcome, SqlRouterError> {
        let composed = compose_insert(table, data, options)?;
        let statement = self.execute(&composed.query, &composed.params, true)?;
        let last_insert_id = self.connection.primary()?.last_insert_id()?;
        Ok(InsertOutcome::resolve(last_insert_id, || statement.row_count()))
    }

    /// `INSERT IGNORE INTO ...`
    ///
    /// # Errors
    /// Same as [`insert`](Self::insert).
    pub fn insert_ignore(
        &mut self,
        table: &str,
        data: &ColumnMap,
    ) -> Result<InsertOutcome, SqlRouterError> {
        self.insert(table, data, &InsertOptions::ignore())
    }

    /// `INSERT ... ON DUPLICATE KEY UPDATE`, with `update` values emitted literally.
    ///
    /// # Errors
    /// `QueryRequirement` if `update` is empty; otherwise as [`insert`](Self::insert).
    pub fn insert_on_duplicate_update(
        &mut self,
        table: &str,
        data: &ColumnMap,
        update: &ColumnMap,
    ) -> Result<InsertOutcome, SqlRouterError> {
        if update.is_empty() {
            return Err(SqlRouterError::QueryRequirement(
                "on duplicate update data is required".into(),
            ));
        }
        self.insert(table, data, &InsertOptions::on_duplicate(update.clone()))
    }

    /// Update rows on the primary, returning the affected-row count.
    ///
    /// # Errors
    /// `QueryRequirement` for an empty WHERE, `InvalidQuery` for empty data or a
    /// malformed WHERE, `QueryError` if the statement fails.
    pub fn update(
        &mut self,
        table: &str,
        data: &ColumnMap,
        condition: impl Into<Where>,
    ) -> Result<usize, SqlRouterError> {
        let composed = compose_update(table, data, &condition.into())?;
        let statement = self.execute(&composed.query, &composed.params, true)?;
        Ok(statement.row_count())
    }

    /// Delete rows on the primary, returning the affected-row count.
    ///
    /// # Errors
    /// `QueryRequirement` for an empty WHERE, `InvalidQuery` for a malformed one,
    /// `QueryError` if the statement fails.
    pub fn delete(
        &mut self,
        table: &str,
        condition: impl Into<Where>,
    ) -> Result<usize, SqlRouterError> {
        let composed = compose_delete(table, &condition.into())?;
        let statement = self.execute(&composed.query, &composed.params, true)?;
        Ok(statement.row_count())
    }
}
