//! Scripted collaborators and event recording for tests.

mod events;
mod mock;

pub use events::{EventLog, RecordedEvent, record_events};
pub use mock::{MockHandle, MockProvider, MockState, MockStatement};

use std::sync::Arc;

use crate::results::ResultSet;
use crate::types::RowValues;

/// Build a result set from column names and rows of values.
#[must_use]
pub fn create_result_set(column_names: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(
        column_names.iter().map(|c| (*c).to_string()).collect(),
    ));
    for row in rows {
        result_set.add_row_values(row);
    }
    result_set
}
