//! Statement execution: routing, events, error classification and the one-shot
//! reconnect on stale connections.

mod retry;

pub use retry::is_connection_gone;

use tracing::{debug, warn};

use crate::adapter::Adapter;
use crate::error::{DriverError, SqlRouterError};
use crate::events::{QueryEvent, QueryEventName, QuerySubject};
use crate::pool::{ConnectionProvider, DriverHandle, PreparedStatement, StatementOf};
use crate::types::{Endpoint, RowValues};

use retry::MAX_RETRIES;

/// A failed attempt, keeping the statement when preparation got that far.
struct FailedAttempt<S> {
    statement: Option<S>,
    error: DriverError,
}

fn attempt<P: ConnectionProvider>(
    connection: &mut P,
    endpoint: Endpoint,
    sql: &str,
    params: &[RowValues],
) -> Result<StatementOf<P>, FailedAttempt<StatementOf<P>>> {
    let failed = |error: DriverError| FailedAttempt::<StatementOf<P>> {
        statement: None,
        error,
    };
    let handle = connection.handle(endpoint).map_err(failed)?;
    let mut statement = handle.prepare(sql).map_err(failed)?;
    match statement.execute(params) {
        Ok(()) => Ok(statement),
        Err(error) => Err(FailedAttempt {
            statement: Some(statement),
            error,
        }),
    }
}

impl<P: ConnectionProvider> Adapter<P> {
    /// Prepare and execute `sql` with `params`, routed to the primary when `use_primary`
    /// is set or a transaction is open.
    ///
    /// Emits one `query_pre_execute` per call and one `query_post_execute` per attempt.
    /// A stale connection outside a transaction is reconnected and retried once.
    pub(crate) fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
        use_primary: bool,
    ) -> Result<StatementOf<P>, SqlRouterError> {
        let endpoint = Endpoint::route(use_primary, self.in_transaction);
        self.dispatcher.dispatch(
            QueryEventName::PreExecute,
            &QueryEvent::new(QuerySubject::Sql(sql), params, endpoint.is_primary(), None),
        );

        let mut retries = 0;
        loop {
            let endpoint = Endpoint::route(use_primary, self.in_transaction);
            debug!(%endpoint, retries, sql, "executing statement");

            let failed = match attempt(&mut self.connection, endpoint, sql, params) {
                Ok(statement) => {
                    self.dispatcher.dispatch(
                        QueryEventName::PostExecute,
                        &QueryEvent::new(
                            QuerySubject::Statement(&statement),
                            params,
                            endpoint.is_primary(),
                            None,
                        ),
                    );
                    return Ok(statement);
                }
                Err(failed) => failed,
            };

            let stale = is_connection_gone(&failed.error);
            let error = SqlRouterError::query(failed.error);
            let subject = match &failed.statement {
                Some(statement) => QuerySubject::Statement(statement),
                None => QuerySubject::Sql(sql),
            };
            self.dispatcher.dispatch(
                QueryEventName::PostExecute,
                &QueryEvent::new(subject, params, endpoint.is_primary(), Some(&error)),
            );

            // A retry would run on a fresh connection outside the open transaction.
            if self.in_transaction {
                debug!(%endpoint, %error, "statement failed inside transaction, not retrying");
                return Err(error);
            }
            if !stale || retries >= MAX_RETRIES {
                debug!(%endpoint, retries, %error, "statement failed");
                return Err(error);
            }

            warn!(%endpoint, %error, "connection gone away, reconnecting and retrying once");
            self.connection.reconnect()?;
            retries += 1;
        }
    }
}
