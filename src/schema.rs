//! Schema definitions and the classification of loaded schema artifacts.

use crate::error::PluginError;
use crate::server::Server;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// One secondary index declared by a schema. Key order is significant for
/// compound indexes; values are the usual `1` / `-1` directions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub keys: Map<String, Value>,
    #[serde(default)]
    pub unique: bool,
}

/// The schema shape this crate recognizes. The `fields` member is the marker
/// that distinguishes a schema from arbitrary data: a JSON document without
/// it never classifies as a schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Collection name override; defaults to the lowercased model name.
    #[serde(default)]
    pub collection: Option<String>,
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
}

pub type FactoryFuture = Pin<Box<dyn Future<Output = Result<Value, PluginError>> + Send>>;

/// A factory producing a schema value, given the live server so schema
/// authors can attach event hooks during construction.
pub type SchemaFactory = Arc<dyn Fn(Server) -> FactoryFuture + Send + Sync>;

/// Registered factories, keyed by schema file stem.
pub type SchemaFactories = HashMap<String, SchemaFactory>;

/// A loaded schema artifact, classified before use.
pub enum SchemaSource {
    Definition(SchemaDefinition),
    Factory(SchemaFactory),
}

/// Classifies a loaded value. `{"factory": "<stem>"}` resolves through the
/// registry; an object carrying `fields` parses as a direct definition.
/// Anything else is unusable and the caller rejects the file.
pub fn classify(value: &Value, factories: &SchemaFactories) -> Option<SchemaSource> {
    if let Some(name) = value.get("factory").and_then(Value::as_str) {
        return factories.get(name).cloned().map(SchemaSource::Factory);
    }
    serde_json::from_value::<SchemaDefinition>(value.clone())
        .ok()
        .map(SchemaSource::Definition)
}

/// Convenience for building a [`SchemaFactory`] from an async closure.
pub fn schema_factory<F, Fut>(f: F) -> SchemaFactory
where
    F: Fn(Server) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, PluginError>> + Send + 'static,
{
    Arc::new(move |server| Box::pin(f(server)))
}
