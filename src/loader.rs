//! Model loader: turns one discovered schema file into a bound model.

use crate::client::MongoConnection;
use crate::discover::DiscoveredSchema;
use crate::error::PluginError;
use crate::schema::{classify, SchemaDefinition, SchemaFactories, SchemaSource};
use crate::server::Server;
use serde_json::Value;

/// Loads the file, classifies it, runs the factory if one applies, and binds
/// the definition to the connection under the derived model name.
///
/// Any unusable artifact (unreadable file, plain data, unregistered factory,
/// factory producing a non-schema value) rejects with a `ModelCreationError`
/// naming the file, which aborts the whole registration.
pub async fn create_model<C: MongoConnection>(
    server: &Server,
    factories: &SchemaFactories,
    connection: &C,
    info: &DiscoveredSchema,
) -> Result<C::Model, PluginError> {
    let raw = tokio::fs::read_to_string(&info.path)
        .await
        .map_err(|_| PluginError::model_creation(&info.base))?;
    let value: Value =
        serde_json::from_str(&raw).map_err(|_| PluginError::model_creation(&info.base))?;

    let source =
        classify(&value, factories).ok_or_else(|| PluginError::model_creation(&info.base))?;

    let definition = match source {
        SchemaSource::Definition(definition) => definition,
        SchemaSource::Factory(factory) => {
            let produced = factory(server.clone()).await?;
            serde_json::from_value::<SchemaDefinition>(produced)
                .map_err(|_| PluginError::model_creation(&info.base))?
        }
    };

    connection.model(&info.name, definition).await
}
