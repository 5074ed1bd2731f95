//! MongoDB-driver-backed implementation of the client seam.

use crate::client::{MongoClient, MongoConnection};
use crate::error::PluginError;
use crate::schema::{IndexSpec, SchemaDefinition};
use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{ClientOptions, Credential, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde_json::{Map, Value};

/// Connects through the `mongodb` crate. Recognized client-option keys:
/// `auth { user, password }` and `autoIndex`; everything else rides along
/// untouched (e.g. `useNewUrlParser`, which only the legacy driver reads).
#[derive(Clone, Copy, Debug, Default)]
pub struct DriverClient;

#[derive(Clone)]
pub struct DriverConnection {
    client: Client,
    database: Database,
    name: String,
    auto_index: bool,
}

#[derive(Clone)]
pub struct DriverModel {
    name: String,
    collection: Collection<Document>,
}

#[async_trait]
impl MongoClient for DriverClient {
    type Conn = DriverConnection;

    async fn connect(
        &self,
        uri: &str,
        options: &Map<String, Value>,
    ) -> Result<DriverConnection, PluginError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        if let Some(auth) = options.get("auth").and_then(Value::as_object) {
            let mut credential = Credential::builder().build();
            credential.username = auth
                .get("user")
                .and_then(Value::as_str)
                .map(str::to_string);
            credential.password = auth
                .get("password")
                .and_then(Value::as_str)
                .map(str::to_string);
            client_options.credential = Some(credential);
        }
        let auto_index = options
            .get("autoIndex")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| "test".to_string());
        let client = Client::with_options(client_options)?;
        let database = client.database(&name);

        // The driver connects lazily; ping so connection failures surface
        // here instead of on first query.
        database.run_command(doc! { "ping": 1 }).await?;

        Ok(DriverConnection {
            client,
            database,
            name,
            auto_index,
        })
    }
}

#[async_trait]
impl MongoConnection for DriverConnection {
    type Model = DriverModel;

    fn name(&self) -> &str {
        &self.name
    }

    async fn model(
        &self,
        name: &str,
        schema: SchemaDefinition,
    ) -> Result<DriverModel, PluginError> {
        let collection_name = schema
            .collection
            .clone()
            .unwrap_or_else(|| name.to_lowercase());
        let collection = self.database.collection::<Document>(&collection_name);

        if self.auto_index {
            for index in &schema.indexes {
                let index = IndexModel::builder()
                    .keys(index_keys(name, index)?)
                    .options(IndexOptions::builder().unique(index.unique).build())
                    .build();
                collection.create_index(index).await?;
            }
        }

        Ok(DriverModel {
            name: name.to_string(),
            collection,
        })
    }
}

/// Translates an index's key map to driver form. Only the `1` / `-1`
/// directions are supported; anything else is rejected rather than silently
/// reshaping the index.
fn index_keys(model: &str, index: &IndexSpec) -> Result<Document, PluginError> {
    let mut keys = Document::new();
    for (field, direction) in &index.keys {
        match direction.as_i64() {
            Some(direction @ (1 | -1)) => {
                keys.insert(field.clone(), Bson::Int32(direction as i32));
            }
            _ => {
                return Err(PluginError::UnsupportedIndexDirection {
                    model: model.to_string(),
                    field: field.clone(),
                })
            }
        }
    }
    Ok(keys)
}

impl DriverConnection {
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl DriverModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying collection handle, for data operations.
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }
}
