//! MongoDB implementation of the driver seam.

use std::sync::Arc;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use parking_lot::RwLock;
use tracing::debug;

use super::{DriverClient, DriverDatabase};

/// MongoDB client that can be reopened after it was closed.
///
/// `Client::shutdown` is permanent, so `close` marks the client as shut down
/// and the next `connect` builds a replacement from the same options. Clones
/// share one client: closing through any clone closes it for all of them,
/// and reconnecting through any clone reopens it for all of them.
#[derive(Debug, Clone)]
pub struct MongoDriver {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    options: ClientOptions,
    state: RwLock<ClientState>,
}

#[derive(Debug)]
struct ClientState {
    client: Client,
    shut_down: bool,
}

impl MongoDriver {
    /// Build a driver from resolved client options.
    ///
    /// # Errors
    /// Returns the driver's error if the client cannot be built.
    pub fn new(options: ClientOptions) -> mongodb::error::Result<Self> {
        let client = Client::with_options(options.clone())?;

        Ok(Self {
            shared: Arc::new(Shared {
                options,
                state: RwLock::new(ClientState {
                    client,
                    shut_down: false,
                }),
            }),
        })
    }

    /// Get the current underlying client.
    ///
    /// After a close this is the shut-down client until the next `connect`.
    pub fn client(&self) -> Client {
        self.shared.state.read().client.clone()
    }

    /// Options every (re)built client uses.
    pub fn options(&self) -> &ClientOptions {
        &self.shared.options
    }

    /// Whether the client was closed and has not been reopened since.
    pub fn is_shut_down(&self) -> bool {
        self.shared.state.read().shut_down
    }

    fn reopen(&self) -> mongodb::error::Result<Client> {
        let mut state = self.shared.state.write();
        if state.shut_down {
            state.client = Client::with_options(self.shared.options.clone())?;
            state.shut_down = false;
            debug!("Rebuilt MongoDB client after shutdown");
        }
        Ok(state.client.clone())
    }
}

impl DriverClient for MongoDriver {
    type Database = Database;
    type Error = mongodb::error::Error;

    /// The Rust driver connects lazily, so connectivity is checked with a
    /// ping against `admin`.
    async fn connect(&self) -> Result<(), Self::Error> {
        let client = self.reopen()?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        debug!("MongoDB ping succeeded");
        Ok(())
    }

    /// Shuts down the shared client without waiting for open cursors or
    /// sessions; they fail on their next use.
    async fn close(&self) -> Result<(), Self::Error> {
        let client = {
            let mut state = self.shared.state.write();
            state.shut_down = true;
            state.client.clone()
        };

        client.shutdown().immediate(true).await;
        Ok(())
    }

    fn database(&self, name: &str) -> Database {
        self.client().database(name)
    }
}

impl DriverDatabase for Database {
    type Collection<T: Send + Sync> = Collection<T>;

    fn name(&self) -> &str {
        Database::name(self)
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        Database::collection(self, name)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mongodb::error::ErrorKind;

    use super::*;

    async fn unreachable_driver() -> MongoDriver {
        // Nothing listens on port 1, so server selection fails fast.
        let mut options = ClientOptions::parse("mongodb://127.0.0.1:1/?directConnection=true")
            .await
            .unwrap();
        options.connect_timeout = Some(Duration::from_millis(200));
        options.server_selection_timeout = Some(Duration::from_millis(200));
        MongoDriver::new(options).unwrap()
    }

    #[tokio::test]
    async fn test_connect_unreachable_is_server_selection_error() {
        let driver = unreachable_driver().await;
        let err = driver.connect().await.unwrap_err();

        assert!(matches!(*err.kind, ErrorKind::ServerSelection { .. }));
        assert!(!driver.is_shut_down());
    }

    #[tokio::test]
    async fn test_close_shuts_down_every_clone() {
        let driver = unreachable_driver().await;
        let other = driver.clone();

        driver.close().await.unwrap();

        assert!(other.is_shut_down());
        let err = other
            .client()
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .unwrap_err();
        assert!(matches!(*err.kind, ErrorKind::Shutdown));
    }

    #[tokio::test]
    async fn test_connect_after_close_reopens_client() {
        let driver = unreachable_driver().await;
        let other = driver.clone();

        driver.close().await.unwrap();
        let err = other.connect().await.unwrap_err();

        // The rebuilt client reaches server selection instead of failing
        // with `Shutdown`.
        assert!(matches!(*err.kind, ErrorKind::ServerSelection { .. }));
        assert!(!driver.is_shut_down());
    }

    #[tokio::test]
    async fn test_close_does_not_wait() {
        let driver = unreachable_driver().await;
        let _db = driver.database("testdb");

        let closed = tokio::time::timeout(Duration::from_secs(5), driver.close()).await;
        assert!(matches!(closed, Ok(Ok(()))));
        assert!(driver.is_shut_down());
    }

    #[tokio::test]
    async fn test_database_uses_current_client() {
        let driver = unreachable_driver().await;
        let db = driver.database("inventory");
        assert_eq!(db.name(), "inventory");
        assert_eq!(
            db.collection::<mongodb::bson::Document>("items").name(),
            "items"
        );
    }
}
