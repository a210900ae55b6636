use thiserror::Error;

/// Failure reported by a driver handle, a prepared statement, or the connection provider.
///
/// The executor classifies stale connections from `message`; `code` holds the backend's
/// native error code when it has one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    code: Option<String>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for DriverError {
    fn from(err: rusqlite::Error) -> Self {
        let message = err.to_string();
        match err {
            rusqlite::Error::SqliteFailure(inner, _) => {
                DriverError::new(message).with_code(format!("{:?}", inner.code))
            }
            _ => DriverError::new(message),
        }
    }
}

#[derive(Debug, Error)]
pub enum SqlRouterError {
    /// Statement execution failed; the driver failure is kept as the source.
    #[error("Query Exception: {source}")]
    QueryError {
        #[source]
        source: DriverError,
    },

    /// Caller-supplied inputs are ill-formed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A required argument is missing (empty WHERE, empty on-duplicate data, ...).
    #[error("Query requirement not met: {0}")]
    QueryRequirement(String),

    /// Driver failure outside statement execution (transaction control, reconnect,
    /// last-insert-id, quoting).
    #[error(transparent)]
    DriverError(#[from] DriverError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl SqlRouterError {
    pub(crate) fn query(source: DriverError) -> Self {
        SqlRouterError::QueryError { source }
    }

    /// The underlying driver failure, when this error carries one.
    #[must_use]
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            SqlRouterError::QueryError { source } | SqlRouterError::DriverError(source) => {
                Some(source)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_query_error(&self) -> bool {
        matches!(self, SqlRouterError::QueryError { .. })
    }

    #[must_use]
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, SqlRouterError::InvalidQuery(_))
    }

    #[must_use]
    pub fn is_query_requirement(&self) -> bool {
        matches!(self, SqlRouterError::QueryRequirement(_))
    }
}

impl From<serde_json::Error> for SqlRouterError {
    fn from(err: serde_json::Error) -> Self {
        SqlRouterError::ConfigError(format!("invalid options: {err}"))
    }
}
