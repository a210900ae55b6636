use crate::error::DriverError;

/// Retries allowed per logical query.
pub(crate) const MAX_RETRIES: u32 = 1;

/// Driver messages that mean the server dropped the connection between statements.
///
/// MySQL drivers expose no stable code for this across client libraries, so the
/// message is the only signal.
const CONNECTION_GONE_PATTERNS: &[&str] = &["server has gone away"];

/// Whether `error` reports a stale connection that a reconnect can recover from.
#[must_use]
pub fn is_connection_gone(error: &DriverError) -> bool {
    let message = error.message().to_lowercase();
    CONNECTION_GONE_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}
