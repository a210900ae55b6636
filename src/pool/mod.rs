//! Collaborator seams: the connection provider and the driver it hands out.

mod driver;

pub use driver::{DriverHandle, PreparedStatement};

use crate::error::DriverError;
use crate::types::Endpoint;

/// Supplies primary and replica driver handles.
///
/// The provider owns handle lifetimes. Callers acquire a handle per operation and never
/// keep it across calls, so after [`reconnect`](ConnectionProvider::reconnect) the next
/// acquisition yields a fresh connection.
pub trait ConnectionProvider {
    type Handle: DriverHandle;

    /// Handle to the writable endpoint.
    ///
    /// # Errors
    /// Returns `DriverError` if the connection cannot be opened.
    fn primary(&mut self) -> Result<Self::Handle, DriverError>;

    /// Handle to the read-only endpoint.
    ///
    /// # Errors
    /// Returns `DriverError` if the connection cannot be opened.
    fn replica(&mut self) -> Result<Self::Handle, DriverError>;

    /// Force stale handles to be reopened on next acquisition.
    ///
    /// # Errors
    /// Returns `DriverError` if the provider cannot reset its connections.
    fn reconnect(&mut self) -> Result<(), DriverError>;

    /// Drop every handle the provider has opened.
    fn close_opened_connections(&mut self);

    /// Handle for `endpoint`.
    ///
    /// # Errors
    /// Returns `DriverError` if the connection cannot be opened.
    fn handle(&mut self, endpoint: Endpoint) -> Result<Self::Handle, DriverError> {
        match endpoint {
            Endpoint::Primary => self.primary(),
            Endpoint::Replica => self.replica(),
        }
    }
}

/// Prepared statement type produced by a provider's handles.
pub type StatementOf<P> = <<P as ConnectionProvider>::Handle as DriverHandle>::Statement;
