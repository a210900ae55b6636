use std::cell::RefCell;
use std::rc::Rc;

use crate::adapter::Adapter;
use crate::events::{QueryEvent, QueryEventName};
use crate::pool::ConnectionProvider;
use crate::types::RowValues;

/// Owned snapshot of a [`QueryEvent`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: QueryEventName,
    pub query: String,
    pub has_statement: bool,
    pub has_parameters: bool,
    pub parameters: Vec<RowValues>,
    pub used_primary: bool,
    /// Display form of the carried error.
    pub exception: Option<String>,
    pub exception_is_query_error: bool,
}

impl RecordedEvent {
    fn capture(name: QueryEventName, event: &QueryEvent<'_>) -> Self {
        Self {
            name,
            query: event.query().to_string(),
            has_statement: event.has_statement(),
            has_parameters: event.has_parameters(),
            parameters: event.parameters().to_vec(),
            used_primary: event.is_using_primary(),
            exception: event.exception().map(ToString::to_string),
            exception_is_query_error: event.exception().is_some_and(|e| e.is_query_error()),
        }
    }

    #[must_use]
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }
}

/// Shared, ordered log of every event an adapter emitted.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn all(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn named(&self, name: QueryEventName) -> Vec<RecordedEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn pre(&self) -> Vec<RecordedEvent> {
        self.named(QueryEventName::PreExecute)
    }

    #[must_use]
    pub fn post(&self) -> Vec<RecordedEvent> {
        self.named(QueryEventName::PostExecute)
    }
}

/// Bind recorders for both event names on `adapter`.
pub fn record_events<P: ConnectionProvider>(adapter: &mut Adapter<P>) -> EventLog {
    let log = EventLog::default();
    for name in [QueryEventName::PreExecute, QueryEventName::PostExecute] {
        let events = Rc::clone(&log.events);
        adapter.bind_event(name, move |event| {
            events.borrow_mut().push(RecordedEvent::capture(name, event));
        });
    }
    log
}
