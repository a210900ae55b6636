use std::fmt;

/// Result of an insert through the adapter.
///
/// Drivers report a last-insert-id of `"0"` (or nothing) for composite or non-integer
/// keys, for `INSERT IGNORE` of a duplicate and for `ON DUPLICATE KEY UPDATE`. In those
/// cases the affected-row count is the meaningful signal, so it is returned instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The driver's last-insert-id, as the driver reported it.
    LastInsertId(String),
    /// Affected-row count of the insert statement.
    AffectedRows(usize),
}

impl InsertOutcome {
    /// Pick the outcome from the driver's last-insert-id, falling back to `row_count`.
    pub fn resolve(last_insert_id: Option<String>, row_count: impl FnOnce() -> usize) -> Self {
        match last_insert_id {
            Some(id) if !id.is_empty() && id != "0" => InsertOutcome::LastInsertId(id),
            _ => InsertOutcome::AffectedRows(row_count()),
        }
    }

    #[must_use]
    pub fn last_insert_id(&self) -> Option<&str> {
        match self {
            InsertOutcome::LastInsertId(id) => Some(id),
            InsertOutcome::AffectedRows(_) => None,
        }
    }

    #[must_use]
    pub fn affected_rows(&self) -> Option<usize> {
        match self {
            InsertOutcome::AffectedRows(rows) => Some(*rows),
            InsertOutcome::LastInsertId(_) => None,
        }
    }
}

impl fmt::Display for InsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertOutcome::LastInsertId(id) => f.write_str(id),
            InsertOutcome::AffectedRows(rows) => write!(f, "{rows}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_id_wins() {
        let outcome = InsertOutcome::resolve(Some("12345".into()), || unreachable!());
        assert_eq!(outcome, InsertOutcome::LastInsertId("12345".into()));
        assert_eq!(outcome.to_string(), "12345");
    }

    #[test]
    fn falsy_ids_fall_back_to_row_count() {
        for id in [None, Some(String::new()), Some("0".to_string())] {
            assert_eq!(InsertOutcome::resolve(id, || 2), InsertOutcome::AffectedRows(2));
        }
    }
}
