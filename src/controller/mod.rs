//! Connection controller.
//!
//! Owns one driver client and one target database name, and tracks whether
//! that database is currently usable. Access to collections is guarded by the
//! connection status.

mod status;

pub use status::ConnectionStatus;

use tracing::{debug, info, warn};

use crate::driver::{DriverClient, DriverDatabase, MongoDriver};
use crate::error::{ControllerError, Result};

/// Collection handle type produced by a controller over client `C`.
pub type CollectionOf<C, T> = <<C as DriverClient>::Database as DriverDatabase>::Collection<T>;

/// Controller for one logical database connection.
///
/// Several controllers may wrap clones of the same client. Disconnecting one
/// of them closes the shared connection, but only that controller's status
/// changes; the others keep reporting [`ConnectionStatus::Connected`] until
/// an operation against the server fails.
#[derive(Debug)]
pub struct ConnectionController<C: DriverClient = MongoDriver> {
    client: C,
    database_name: String,
    status: ConnectionStatus,
    database: Option<C::Database>,
}

impl<C: DriverClient> ConnectionController<C> {
    /// Wrap `client`, targeting `database_name`. Starts disconnected.
    pub fn new(client: C, database_name: impl Into<String>) -> Self {
        Self {
            client,
            database_name: database_name.into(),
            status: ConnectionStatus::Disconnected,
            database: None,
        }
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    /// Name of the database this controller is bound to.
    ///
    /// Reads the active handle when connected and the configured target
    /// otherwise. Returns `None` if the name is empty.
    pub fn database_name(&self) -> Option<&str> {
        let name = match &self.database {
            Some(db) => db.name(),
            None => self.database_name.as_str(),
        };
        (!name.is_empty()).then_some(name)
    }

    /// Get a reference to the underlying driver client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Connect to the server and select the target database.
    ///
    /// Does nothing if already connected.
    ///
    /// # Errors
    /// Returns [`ControllerError::Connection`] if the driver fails to
    /// connect. The status stays [`ConnectionStatus::Disconnected`].
    pub async fn connect(&mut self) -> Result<&mut Self> {
        if self.status.is_connected() {
            debug!("Already connected to {}, skipping connect", self.database_name);
            return Ok(self);
        }

        if let Err(e) = self.client.connect().await {
            warn!("Failed to connect to database {}: {}", self.database_name, e);
            return Err(ControllerError::connection(e));
        }

        self.database = Some(self.client.database(&self.database_name));
        self.status = ConnectionStatus::Connected;
        info!("Connected to database {}", self.database_name);

        Ok(self)
    }

    /// Close the underlying client.
    ///
    /// Returns `true` if the client was closed or the controller was already
    /// disconnected, and `false` if the driver failed to close. A failed
    /// close leaves the status unchanged. [`MongoDriver`] closes without
    /// waiting for open cursors or sessions, and a later `connect` reopens
    /// the client.
    pub async fn disconnect(&mut self) -> bool {
        if !self.status.is_connected() {
            debug!("Already disconnected from {}", self.database_name);
            return true;
        }

        if let Err(e) = self.client.close().await {
            warn!("Failed to close connection to {}: {}", self.database_name, e);
            return false;
        }

        self.database = None;
        self.status = ConnectionStatus::Disconnected;
        info!("Disconnected from database {}", self.database_name);

        true
    }

    /// Ensure the controller is connected.
    ///
    /// # Errors
    /// Returns [`ControllerError::NotConnected`] otherwise.
    pub fn require_connected(&self) -> Result<()> {
        if self.status.is_connected() {
            Ok(())
        } else {
            Err(ControllerError::NotConnected)
        }
    }

    /// Active database handle, if connected. Not guarded.
    pub fn database(&self) -> Option<&C::Database> {
        self.database.as_ref()
    }

    /// Active database handle without the status guard.
    ///
    /// For callers that already know the connection is up. Fails with
    /// [`ControllerError::NotConnected`] when no handle has been selected.
    pub fn unchecked_database(&self) -> Result<&C::Database> {
        self.database.as_ref().ok_or(ControllerError::NotConnected)
    }

    /// Get a typed collection from the connected database.
    ///
    /// # Errors
    /// Returns [`ControllerError::NotConnected`] if not connected.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Result<CollectionOf<C, T>> {
        self.require_connected()?;
        Ok(self.unchecked_database()?.collection(name))
    }
}
