use tracing::info;

use crate::error::SqlRouterError;
use crate::pool::{ConnectionProvider, DriverHandle};

use super::Adapter;

impl<P: ConnectionProvider> Adapter<P> {
    /// Start a transaction on the primary.
    ///
    /// The flag is raised before the driver call, so routing and retry suppression
    /// apply even if the driver fails; no reconciliation is attempted in that case.
    ///
    /// # Errors
    /// `DriverError` if the primary is unavailable or refuses to begin.
    pub fn begin_transaction(&mut self) -> Result<(), SqlRouterError> {
        self.in_transaction = true;
        info!("beginning transaction on primary");
        self.connection.primary()?.begin_transaction()?;
        Ok(())
    }

    /// Commit the open transaction.
    ///
    /// # Errors
    /// `DriverError` if the primary refuses; the adapter then stays in transaction.
    pub fn commit(&mut self) -> Result<(), SqlRouterError> {
        self.connection.primary()?.commit()?;
        self.in_transaction = false;
        info!("committed transaction");
        Ok(())
    }

    /// Roll back the open transaction.
    ///
    /// # Errors
    /// `DriverError` if the primary refuses; the adapter then stays in transaction.
    pub fn roll_back(&mut self) -> Result<(), SqlRouterError> {
        self.connection.primary()?.roll_back()?;
        self.in_transaction = false;
        info!("rolled back transaction");
        Ok(())
    }

    #[must_use]
    pub fn is_in_transaction(&self) -> bool {
        self.in_transaction
    }
}
