//! The database client seam: the narrow contract the provisioner consumes.
//!
//! The driver-backed implementation lives in [`crate::driver`]; tests inject
//! in-memory implementations to exercise provisioning without a live server.

use crate::error::PluginError;
use crate::schema::SchemaDefinition;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Opens connections. `options` is the fully merged client-option map; an
/// implementation applies the keys it understands and ignores the rest.
#[async_trait]
pub trait MongoClient: Send + Sync {
    type Conn: MongoConnection;

    async fn connect(
        &self,
        uri: &str,
        options: &Map<String, Value>,
    ) -> Result<Self::Conn, PluginError>;
}

/// An established connection that can bind models.
#[async_trait]
pub trait MongoConnection: Clone + Send + Sync + 'static {
    type Model: Clone + Send + Sync + 'static;

    /// Intrinsic database name; the namespace key when no alias is set.
    fn name(&self) -> &str;

    /// Binds a schema definition under the derived model name.
    async fn model(
        &self,
        name: &str,
        schema: SchemaDefinition,
    ) -> Result<Self::Model, PluginError>;
}
