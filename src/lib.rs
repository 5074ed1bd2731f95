//! mongo-provision: configuration-driven MongoDB provisioning for axum services.
//!
//! On registration the plugin opens one or more connections, discovers schema
//! files through glob patterns, binds a model per file, and exposes the
//! resulting namespace through the host server's state container and any
//! configured extension-point decorations.

pub mod client;
pub mod config;
pub mod discover;
pub mod driver;
pub mod error;
pub mod loader;
pub mod namespace;
pub mod plugin;
pub mod provision;
pub mod schema;
pub mod server;

/// Fixed `tracing` target for every record this crate emits.
pub const LOG_TARGET: &str = "mongo_provision";

pub use client::{MongoClient, MongoConnection};
pub use config::{
    resolve, validate, ConnectionOptions, Decoration, PluginOptions, ResolvedConnection,
    ResolvedOptions,
};
pub use discover::{discover, DiscoveredSchema};
pub use driver::{DriverClient, DriverConnection, DriverModel};
pub use error::{ConfigError, PluginError};
pub use loader::create_model;
pub use namespace::{assemble, expose, Namespace, ProvisionedConnection};
pub use plugin::{register, register_with_client, MongoNamespace, PLUGIN_NAME};
pub use provision::provision;
pub use schema::{
    schema_factory, IndexSpec, SchemaDefinition, SchemaFactories, SchemaFactory, SchemaSource,
};
pub use server::{Event, Server};
