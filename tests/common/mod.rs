//! In-memory client implementation for exercising registration end to end.

use async_trait::async_trait;
use mongo_provision::{MongoClient, MongoConnection, PluginError, SchemaDefinition};
use serde_json::{Map, Value};

/// Connects without touching the network. `fail_on` simulates a connection
/// error for a matching uri; the intrinsic database name is taken from the
/// uri path, like the driver does.
#[derive(Default)]
pub struct FakeClient {
    pub fail_on: Option<String>,
}

#[derive(Clone)]
pub struct FakeConnection {
    pub name: String,
    pub options: Map<String, Value>,
}

#[derive(Clone)]
pub struct FakeModel {
    pub name: String,
    pub definition: SchemaDefinition,
}

#[async_trait]
impl MongoClient for FakeClient {
    type Conn = FakeConnection;

    async fn connect(
        &self,
        uri: &str,
        options: &Map<String, Value>,
    ) -> Result<FakeConnection, PluginError> {
        if self.fail_on.as_deref() == Some(uri) {
            return Err(PluginError::Connection(mongodb::error::Error::custom(
                format!("connection refused: {uri}"),
            )));
        }
        let name = uri
            .rsplit('/')
            .next()
            .filter(|n| !n.is_empty())
            .unwrap_or("test")
            .to_string();
        Ok(FakeConnection {
            name,
            options: options.clone(),
        })
    }
}

#[async_trait]
impl MongoConnection for FakeConnection {
    type Model = FakeModel;

    fn name(&self) -> &str {
        &self.name
    }

    async fn model(
        &self,
        name: &str,
        schema: SchemaDefinition,
    ) -> Result<FakeModel, PluginError> {
        Ok(FakeModel {
            name: name.to_string(),
            definition: schema,
        })
    }
}
