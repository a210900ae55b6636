use std::cell::Cell;
use std::rc::Rc;

use rusqlite::Connection;

use crate::error::DriverError;
use crate::pool::{DriverHandle, PreparedStatement};
use crate::results::ResultSet;
use crate::types::{ParamType, RowValues};

use super::params::{Params, quote_literal};
use super::query::build_result_set;

/// A cached connection plus the rowid produced by its most recent statement.
///
/// `last_insert_rowid()` keeps its value until the next rowid insert, so it cannot
/// tell a fresh insert from a `WITHOUT ROWID` or composite-key insert that came later.
#[derive(Debug)]
pub(crate) struct SqliteConnection {
    conn: Connection,
    inserted_rowid: Cell<Option<i64>>,
}

impl SqliteConnection {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn,
            inserted_rowid: Cell::new(None),
        }
    }
}

/// Handle to one cached `SQLite` connection.
#[derive(Debug, Clone)]
pub struct SqliteHandle {
    conn: Rc<SqliteConnection>,
}

impl SqliteHandle {
    pub(crate) fn new(conn: Rc<SqliteConnection>) -> Self {
        Self { conn }
    }
}

impl DriverHandle for SqliteHandle {
    type Statement = SqliteStatement;

    fn prepare(&self, sql: &str) -> Result<SqliteStatement, DriverError> {
        // Compile once so syntax errors surface here; the cache keeps it for execute.
        self.conn.conn.prepare_cached(sql)?;
        Ok(SqliteStatement {
            conn: Rc::clone(&self.conn),
            sql: sql.to_owned(),
            result: None,
            row_count: 0,
        })
    }

    /// The rowid assigned by the last statement run on this connection, if it assigned one.
    fn last_insert_id(&self) -> Result<Option<String>, DriverError> {
        Ok(self.conn.inserted_rowid.get().map(|rowid| rowid.to_string()))
    }

    fn begin_transaction(&self) -> Result<(), DriverError> {
        Ok(self.conn.conn.execute_batch("BEGIN")?)
    }

    fn commit(&self) -> Result<(), DriverError> {
        Ok(self.conn.conn.execute_batch("COMMIT")?)
    }

    fn roll_back(&self) -> Result<(), DriverError> {
        Ok(self.conn.conn.execute_batch("ROLLBACK")?)
    }

    fn quote(&self, value: &RowValues, param_type: ParamType) -> Result<String, DriverError> {
        quote_literal(value, param_type)
    }
}

/// Statement prepared on a [`SqliteHandle`].
///
/// Executing materialises any rows immediately; `row_count` is the number of rows
/// changed by DML or returned by a query.
#[derive(Debug)]
pub struct SqliteStatement {
    conn: Rc<SqliteConnection>,
    sql: String,
    result: Option<ResultSet>,
    row_count: usize,
}

impl PreparedStatement for SqliteStatement {
    fn execute(&mut self, params: &[RowValues]) -> Result<(), DriverError> {
        let params = Params::convert(params);
        let rowid_before = self.conn.conn.last_insert_rowid();
        self.conn.inserted_rowid.set(None);

        let mut stmt = self.conn.conn.prepare_cached(&self.sql)?;
        if stmt.column_count() > 0 {
            let result = build_result_set(&mut stmt, &params.0)?;
            self.row_count = result.len();
            self.result = Some(result);
        } else {
            self.row_count = stmt.execute(&params.as_refs()[..])?;
            self.result = Some(ResultSet::default());
        }

        let rowid_after = self.conn.conn.last_insert_rowid();
        if rowid_after != rowid_before {
            self.conn.inserted_rowid.set(Some(rowid_after));
        }
        Ok(())
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn fetch_all(&mut self) -> Result<ResultSet, DriverError> {
        self.result
            .take()
            .ok_or_else(|| DriverError::new("statement has not been executed"))
    }

    fn sql(&self) -> &str {
        &self.sql
    }
}
