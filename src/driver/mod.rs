//! Driver seam.
//!
//! The controller only needs a handful of operations from a document-database
//! client. They are collected here as traits so the lifecycle logic can run
//! against MongoDB in production and against an in-memory client in
//! tests.

use std::fmt::Debug;
use std::future::Future;

mod mongo;

pub use mongo::MongoDriver;

#[cfg(test)]
pub(crate) mod mock;

/// A document-database client that can be connected, closed and asked for
/// database handles.
pub trait DriverClient: Debug + Send + Sync {
    /// Database handle returned by [`DriverClient::database`].
    type Database: DriverDatabase;

    /// Error reported by the driver on connect or close.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Establish (or verify) connectivity with the server.
    fn connect(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close the underlying connection.
    ///
    /// Clients that share a connection pool are all closed by this call.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Select a database by name.
    fn database(&self, name: &str) -> Self::Database;
}

/// A database handle exposing typed collections.
pub trait DriverDatabase: Debug + Send + Sync {
    /// Collection handle for documents of shape `T`.
    type Collection<T: Send + Sync>;

    /// Name of the database this handle is bound to.
    fn name(&self) -> &str;

    /// Get a typed collection from the database.
    fn collection<T: Send + Sync>(&self, name: &str) -> Self::Collection<T>;
}
