use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::DriverError;
use crate::pool::{ConnectionProvider, DriverHandle, PreparedStatement};
use crate::results::ResultSet;
use crate::types::{Endpoint, ParamType, RowValues};

/// Calls observed by the mock, plus the scripted responses it replays.
#[derive(Debug, Default)]
pub struct MockState {
    pub primary_acquisitions: usize,
    pub replica_acquisitions: usize,
    pub reconnects: usize,
    pub closes: usize,
    /// `(endpoint, sql)` per successful or failed prepare.
    pub prepared: Vec<(Endpoint, String)>,
    /// `(endpoint, sql, params)` per execute call.
    pub executed: Vec<(Endpoint, String, Vec<RowValues>)>,
    /// `"begin"`, `"commit"`, `"rollback"` in call order.
    pub transaction_calls: Vec<&'static str>,
    pub quoted: Vec<(Endpoint, RowValues, ParamType)>,
    pub last_insert_id_calls: usize,

    acquire_errors: VecDeque<DriverError>,
    prepare_errors: VecDeque<DriverError>,
    execute_results: VecDeque<Result<(), DriverError>>,
    transaction_error: Option<DriverError>,
    last_insert_id: Option<String>,
    row_count: usize,
    rows: ResultSet,
}

/// Provider whose handles replay scripted results and record every call.
///
/// Clones share state, so a test keeps one clone to script and inspect while the
/// adapter owns another.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Rc<RefCell<MockState>>,
}

impl MockProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> Ref<'_, MockState> {
        self.state.borrow()
    }

    /// Fail the next handle acquisition.
    pub fn fail_next_acquire(&self, message: &str) -> &Self {
        self.state
            .borrow_mut()
            .acquire_errors
            .push_back(DriverError::new(message));
        self
    }

    /// Fail the next prepare.
    pub fn fail_next_prepare(&self, message: &str) -> &Self {
        self.state
            .borrow_mut()
            .prepare_errors
            .push_back(DriverError::new(message));
        self
    }

    /// Fail the next execute; later executes succeed unless scripted too.
    pub fn fail_next_execute(&self, message: &str) -> &Self {
        self.state
            .borrow_mut()
            .execute_results
            .push_back(Err(DriverError::new(message)));
        self
    }

    /// Make begin/commit/rollback fail with `message`.
    pub fn fail_transactions(&self, message: &str) -> &Self {
        self.state.borrow_mut().transaction_error = Some(DriverError::new(message));
        self
    }

    pub fn set_last_insert_id(&self, id: Option<&str>) -> &Self {
        self.state.borrow_mut().last_insert_id = id.map(str::to_string);
        self
    }

    pub fn set_row_count(&self, row_count: usize) -> &Self {
        self.state.borrow_mut().row_count = row_count;
        self
    }

    pub fn set_rows(&self, rows: ResultSet) -> &Self {
        self.state.borrow_mut().rows = rows;
        self
    }

    #[must_use]
    pub fn executions(&self) -> usize {
        self.state.borrow().executed.len()
    }

    #[must_use]
    pub fn reconnects(&self) -> usize {
        self.state.borrow().reconnects
    }

    /// The last executed `(sql, params)`.
    #[must_use]
    pub fn last_executed(&self) -> Option<(String, Vec<RowValues>)> {
        self.state
            .borrow()
            .executed
            .last()
            .map(|(_, sql, params)| (sql.clone(), params.clone()))
    }

    fn acquire(&self, endpoint: Endpoint) -> Result<MockHandle, DriverError> {
        let mut state = self.state.borrow_mut();
        match endpoint {
            Endpoint::Primary => state.primary_acquisitions += 1,
            Endpoint::Replica => state.replica_acquisitions += 1,
        }
        if let Some(err) = state.acquire_errors.pop_front() {
            return Err(err);
        }
        Ok(MockHandle {
            endpoint,
            state: Rc::clone(&self.state),
        })
    }
}

impl ConnectionProvider for MockProvider {
    type Handle = MockHandle;

    fn primary(&mut self) -> Result<MockHandle, DriverError> {
        self.acquire(Endpoint::Primary)
    }

    fn replica(&mut self) -> Result<MockHandle, DriverError> {
        self.acquire(Endpoint::Replica)
    }

    fn reconnect(&mut self) -> Result<(), DriverError> {
        self.state.borrow_mut().reconnects += 1;
        Ok(())
    }

    fn close_opened_connections(&mut self) {
        self.state.borrow_mut().closes += 1;
    }
}

#[derive(Debug, Clone)]
pub struct MockHandle {
    endpoint: Endpoint,
    state: Rc<RefCell<MockState>>,
}

impl MockHandle {
    fn transaction_call(&self, call: &'static str) -> Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        state.transaction_calls.push(call);
        state.transaction_error.clone().map_or(Ok(()), Err)
    }
}

impl DriverHandle for MockHandle {
    type Statement = MockStatement;

    fn prepare(&self, sql: &str) -> Result<MockStatement, DriverError> {
        let mut state = self.state.borrow_mut();
        state.prepared.push((self.endpoint, sql.to_string()));
        if let Some(err) = state.prepare_errors.pop_front() {
            return Err(err);
        }
        Ok(MockStatement {
            endpoint: self.endpoint,
            sql: sql.to_string(),
            state: Rc::clone(&self.state),
            row_count: 0,
            result: None,
        })
    }

    fn last_insert_id(&self) -> Result<Option<String>, DriverError> {
        let mut state = self.state.borrow_mut();
        state.last_insert_id_calls += 1;
        Ok(state.last_insert_id.clone())
    }

    fn begin_transaction(&self) -> Result<(), DriverError> {
        self.transaction_call("begin")
    }

    fn commit(&self) -> Result<(), DriverError> {
        self.transaction_call("commit")
    }

    fn roll_back(&self) -> Result<(), DriverError> {
        self.transaction_call("rollback")
    }

    fn quote(&self, value: &RowValues, param_type: ParamType) -> Result<String, DriverError> {
        self.state
            .borrow_mut()
            .quoted
            .push((self.endpoint, value.clone(), param_type));
        match value {
            RowValues::Text(text) => Ok(format!("'{}'", text.replace('\'', "\\'"))),
            other => Ok(format!("{other:?}")),
        }
    }
}

#[derive(Debug)]
pub struct MockStatement {
    endpoint: Endpoint,
    sql: String,
    state: Rc<RefCell<MockState>>,
    row_count: usize,
    result: Option<ResultSet>,
}

impl MockStatement {
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }
}

impl PreparedStatement for MockStatement {
    fn execute(&mut self, params: &[RowValues]) -> Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        state
            .executed
            .push((self.endpoint, self.sql.clone(), params.to_vec()));
        state.execute_results.pop_front().unwrap_or(Ok(()))?;
        self.row_count = state.row_count;
        self.result = Some(state.rows.clone());
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
