//! Controller factory.
//!
//! Builds MongoDB clients from connection strings and wraps them in
//! controllers. Nothing here keeps state between calls: every `create_*`
//! call builds a new client, and sharing happens only through an explicit
//! [`ControllerInstance`] or [`with_client`].

use mongodb::Client;
use mongodb::options::ClientOptions;
use tracing::debug;

use crate::config::ConnectOptions;
use crate::controller::ConnectionController;
use crate::driver::{DriverClient, MongoDriver};

/// Controller over the MongoDB driver.
pub type MongoController = ConnectionController<MongoDriver>;

/// Instance sharing one MongoDB client.
pub type MongoInstance = ControllerInstance<MongoDriver>;

/// Builds controllers for different databases on one shared client.
#[derive(Debug, Clone)]
pub struct ControllerInstance<C> {
    client: C,
}

impl<C: DriverClient + Clone> ControllerInstance<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Wrap a clone of the shared client, targeting `database_name`.
    ///
    /// Disconnecting any controller produced here closes the client for all
    /// of them.
    pub fn create_client(&self, database_name: impl Into<String>) -> ConnectionController<C> {
        ConnectionController::new(self.client.clone(), database_name)
    }

    /// Get a reference to the shared client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

/// Build a new MongoDB client and wrap it in a disconnected controller.
///
/// # Errors
/// Returns the driver's error if the URI cannot be parsed or the client
/// cannot be built.
pub async fn create_client(
    uri: &str,
    database_name: &str,
    options: Option<&ConnectOptions>,
) -> mongodb::error::Result<MongoController> {
    let client_options = resolve_options(uri, options).await?;
    create_client_with_options(client_options, database_name)
}

/// Build a controller from fully specified client options.
///
/// For settings [`ConnectOptions`] does not cover, such as credentials, TLS
/// or read preference.
///
/// # Errors
/// Returns the driver's error if the client cannot be built.
pub fn create_client_with_options(
    client_options: ClientOptions,
    database_name: &str,
) -> mongodb::error::Result<MongoController> {
    let driver = MongoDriver::new(client_options)?;
    debug!("Created MongoDB client for {}", database_name);
    Ok(ConnectionController::new(driver, database_name))
}

/// Build one MongoDB client to be shared by every controller the returned
/// instance creates.
///
/// # Errors
/// Same as [`create_client`].
pub async fn create_instance(
    uri: &str,
    options: Option<&ConnectOptions>,
) -> mongodb::error::Result<MongoInstance> {
    let client_options = resolve_options(uri, options).await?;
    create_instance_with_options(client_options)
}

/// Build a shared-client instance from fully specified client options.
///
/// # Errors
/// Returns the driver's error if the client cannot be built.
pub fn create_instance_with_options(
    client_options: ClientOptions,
) -> mongodb::error::Result<MongoInstance> {
    Ok(ControllerInstance::new(MongoDriver::new(client_options)?))
}

/// Wrap an existing client.
///
/// The caller keeps its own handle; closing through the controller closes it
/// for the caller too.
pub fn with_client<C: DriverClient>(
    client: C,
    database_name: impl Into<String>,
) -> ConnectionController<C> {
    ConnectionController::new(client, database_name)
}

/// Build a raw MongoDB client without wrapping it.
///
/// # Errors
/// Returns the driver's error if the URI cannot be parsed or the client
/// cannot be built.
pub async fn create_mongo_client(
    uri: &str,
    options: Option<&ConnectOptions>,
) -> mongodb::error::Result<Client> {
    let client = Client::with_options(resolve_options(uri, options).await?)?;
    debug!("Created raw MongoDB client");

    Ok(client)
}

async fn resolve_options(
    uri: &str,
    options: Option<&ConnectOptions>,
) -> mongodb::error::Result<ClientOptions> {
    let mut client_options = ClientOptions::parse(uri).await?;
    if let Some(options) = options {
        options.apply(&mut client_options);
    }
    Ok(client_options)
}
