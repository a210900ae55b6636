//! Pre/post execution notifications.

use std::collections::HashMap;
use std::fmt;

use crate::error::SqlRouterError;
use crate::pool::PreparedStatement;
use crate::types::RowValues;

/// Named events emitted around statement execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryEventName {
    /// Fired once per logical query, before the first attempt.
    PreExecute,
    /// Fired after every attempt, successful or not.
    PostExecute,
}

impl QueryEventName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            QueryEventName::PreExecute => "query_pre_execute",
            QueryEventName::PostExecute => "query_post_execute",
        }
    }
}

impl fmt::Display for QueryEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the event is about: the raw SQL, or the statement once one was prepared.
#[derive(Clone, Copy)]
pub enum QuerySubject<'a> {
    Sql(&'a str),
    Statement(&'a dyn PreparedStatement),
}

impl fmt::Debug for QuerySubject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySubject::Sql(sql) => f.debug_tuple("Sql").field(sql).finish(),
            QuerySubject::Statement(stmt) => f.debug_tuple("Statement").field(&stmt.sql()).finish(),
        }
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, Copy)]
pub struct QueryEvent<'a> {
    subject: QuerySubject<'a>,
    parameters: &'a [RowValues],
    used_primary: bool,
    exception: Option<&'a SqlRouterError>,
}

impl<'a> QueryEvent<'a> {
    #[must_use]
    pub fn new(
        subject: QuerySubject<'a>,
        parameters: &'a [RowValues],
        used_primary: bool,
        exception: Option<&'a SqlRouterError>,
    ) -> Self {
        Self {
            subject,
            parameters,
            used_primary,
            exception,
        }
    }

    /// SQL text, taken from the statement when one exists.
    #[must_use]
    pub fn query(&self) -> &'a str {
        match self.subject {
            QuerySubject::Sql(sql) => sql,
            QuerySubject::Statement(stmt) => stmt.sql(),
        }
    }

    #[must_use]
    pub fn has_statement(&self) -> bool {
        matches!(self.subject, QuerySubject::Statement(_))
    }

    #[must_use]
    pub fn statement(&self) -> Option<&'a dyn PreparedStatement> {
        match self.subject {
            QuerySubject::Statement(stmt) => Some(stmt),
            QuerySubject::Sql(_) => None,
        }
    }

    #[must_use]
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    #[must_use]
    pub fn parameters(&self) -> &'a [RowValues] {
        self.parameters
    }

    #[must_use]
    pub fn is_using_primary(&self) -> bool {
        self.used_primary
    }

    #[must_use]
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    #[must_use]
    pub fn exception(&self) -> Option<&'a SqlRouterError> {
        self.exception
    }
}

pub type Listener = Box<dyn Fn(&QueryEvent<'_>)>;

/// Delivers events to listeners bound by name, in registration order.
#[derive(Default)]
pub struct Dispatcher {
    listeners: HashMap<QueryEventName, Vec<Listener>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<F>(&mut self, name: QueryEventName, listener: F)
    where
        F: Fn(&QueryEvent<'_>) + 'static,
    {
        self.listeners.entry(name).or_default().push(Box::new(listener));
    }

    pub fn dispatch(&self, name: QueryEventName, event: &QueryEvent<'_>) {
        if let Some(listeners) = self.listeners.get(&name) {
            for listener in listeners {
                listener(event);
            }
        }
    }

    #[must_use]
    pub fn listener_count(&self, name: QueryEventName) -> usize {
        self.listeners.get(&name).map_or(0, Vec::len)
    }
}

// Listeners are closures, so only their counts are printable.
impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pre_execute", &self.listener_count(QueryEventName::PreExecute))
            .field("post_execute", &self.listener_count(QueryEventName::PostExecute))
            .finish()
    }
}
