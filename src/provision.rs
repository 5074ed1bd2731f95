//! Connection provisioner: opens each connection and loads its models.

use crate::client::{MongoClient, MongoConnection};
use crate::config::ResolvedConnection;
use crate::discover::{capitalize, discover};
use crate::error::PluginError;
use crate::loader::create_model;
use crate::namespace::ProvisionedConnection;
use crate::schema::SchemaFactories;
use crate::server::Server;
use crate::LOG_TARGET;
use std::collections::HashMap;

/// Provisions the resolved descriptors strictly in order: multi-connection
/// key assignment and last-wins model-name collisions must be deterministic,
/// so nothing here runs concurrently. The first failure aborts the rest.
pub async fn provision<C: MongoClient>(
    server: &Server,
    client: &C,
    factories: &SchemaFactories,
    connections: Vec<ResolvedConnection>,
) -> Result<Vec<(ResolvedConnection, ProvisionedConnection<C::Conn>)>, PluginError> {
    let mut provisioned = Vec::with_capacity(connections.len());

    for settings in connections {
        let connection = client.connect(&settings.uri, &settings.client_options).await?;
        tracing::info!(
            target: LOG_TARGET,
            database = %connection.name(),
            "connected to database"
        );

        let mut models = HashMap::new();
        for info in discover(&settings.schema_patterns)? {
            let model = create_model(server, factories, &connection, &info).await?;
            // same stem in different directories: last-resolved wins
            models.insert(info.name, model);
        }
        // direct definitions bind after pattern matches and win collisions
        for (stem, definition) in &settings.schemas {
            let name = capitalize(stem);
            let model = connection.model(&name, definition.clone()).await?;
            models.insert(name, model);
        }
        for name in models.keys() {
            tracing::info!(
                target: LOG_TARGET,
                model = %name,
                database = %connection.name(),
                "registered model"
            );
        }

        provisioned.push((settings, ProvisionedConnection { connection, models }));
    }

    Ok(provisioned)
}
