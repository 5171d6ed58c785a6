//! mongo-controller - connection lifecycle for MongoDB clients
//!
//! Wraps a driver client in a controller that tracks whether it is connected
//! and refuses collection access until it is.
//!
//! ## Architecture
//!
//! - `controller` - Connection state machine and guarded access
//! - `factory` - Builds controllers from URIs or existing clients
//! - `driver` - Traits the controller needs from a client, implemented for `mongodb`
//! - `config` - Connect options and environment loading
//! - `error` - Error types
//!
//! ## Usage
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use mongodb::bson::Document;
//!
//! let mut controller =
//!     mongo_controller::create_client("mongodb://localhost:27017", "app", None).await?;
//! controller.connect().await?;
//!
//! let users = controller.collection::<Document>("users")?;
//! let count = users.estimated_document_count().await?;
//!
//! controller.disconnect().await;
//! # let _ = count;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod factory;

pub use controller::{CollectionOf, ConnectionController, ConnectionStatus};
pub use driver::{DriverClient, DriverDatabase, MongoDriver};
pub use error::{ConfigError, ControllerError, Result};
pub use factory::{
    ControllerInstance, MongoController, MongoInstance, create_client,
    create_client_with_options, create_instance, create_instance_with_options,
    create_mongo_client, with_client,
};
