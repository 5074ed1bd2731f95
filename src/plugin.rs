//! Plugin entry point: `register(server, options)`.

use crate::client::MongoClient;
use crate::config::resolve;
use crate::config::PluginOptions;
use crate::driver::{DriverClient, DriverConnection};
use crate::error::PluginError;
use crate::namespace::{assemble, expose, Namespace};
use crate::provision::provision;
use crate::server::Server;
use std::sync::Arc;

pub const PLUGIN_NAME: &str = "mongo-provision";

/// The namespace shape exposed by the driver-backed [`register`].
pub type MongoNamespace = Arc<Namespace<DriverConnection>>;

/// Registers the plugin using the MongoDB driver.
pub async fn register(
    server: &Server,
    options: PluginOptions,
) -> Result<MongoNamespace, PluginError> {
    register_with_client(server, &DriverClient, options).await
}

/// Registers the plugin against an injected client implementation.
///
/// Registration is indivisible: either every connection provisions with all
/// of its models and the namespace is exposed, or the first error rejects
/// the whole operation and nothing is exposed. A failed registration also
/// releases the plugin claim, so a corrected retry can proceed.
pub async fn register_with_client<C: MongoClient>(
    server: &Server,
    client: &C,
    options: PluginOptions,
) -> Result<Arc<Namespace<C::Conn>>, PluginError> {
    server.claim_plugin(PLUGIN_NAME)?;
    match provision_namespace(server, client, options).await {
        Ok(namespace) => Ok(namespace),
        Err(error) => {
            server.release_plugin(PLUGIN_NAME);
            Err(error)
        }
    }
}

async fn provision_namespace<C: MongoClient>(
    server: &Server,
    client: &C,
    options: PluginOptions,
) -> Result<Arc<Namespace<C::Conn>>, PluginError> {
    let resolved = resolve(&options)?;
    let provisioned = provision(server, client, &options.factories, resolved.connections).await?;
    let namespace = Arc::new(assemble(provisioned)?);
    expose(server, &resolved.decorations, namespace.clone());
    Ok(namespace)
}
