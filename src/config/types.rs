//! Raw plugin option types matching the JSON configuration surface.

use crate::schema::{SchemaDefinition, SchemaFactories, SchemaFactory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Host extension points the assembled namespace can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    /// Per-process server context.
    Server,
    /// Per-request context (an `Extension` layer on the consumer's router).
    Request,
}

/// One requested connection, as supplied by the user.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConnectionOptions {
    pub uri: String,
    /// Lookup key in multi-connection mode; takes precedence over the
    /// connection's intrinsic database name. Ignored for a single connection.
    #[serde(default)]
    pub alias: Option<String>,
    /// Ordered glob patterns; a `!` prefix marks an exclusion.
    #[serde(default)]
    pub schema_patterns: Vec<String>,
    /// Direct stem-to-definition mapping, bound alongside any pattern
    /// matches. Model names derive from the stems the same way they derive
    /// from file stems, and direct entries win a name collision.
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaDefinition>,
    /// Options handed opaquely to the driver. Recognized keys: `auth`,
    /// `autoIndex`, `bufferCommands`. Unknown keys are preserved, never stripped.
    #[serde(default, rename = "options")]
    pub client_options: Map<String, Value>,
}

impl ConnectionOptions {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn schema_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Registers a schema definition directly, without a backing file.
    pub fn schema(mut self, stem: impl Into<String>, definition: SchemaDefinition) -> Self {
        self.schemas.insert(stem.into(), definition);
        self
    }

    pub fn client_options(mut self, options: Map<String, Value>) -> Self {
        self.client_options = options;
        self
    }
}

/// Top-level plugin options. Exactly one of `connection` / `connections`
/// must be present; the validator enforces the exclusivity.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PluginOptions {
    #[serde(default)]
    pub connection: Option<ConnectionOptions>,
    #[serde(default)]
    pub connections: Option<Vec<ConnectionOptions>>,
    /// Extension points to decorate; empty means internal exposure only.
    #[serde(default)]
    pub decorations: Vec<Decoration>,
    /// Schema factories keyed by file stem. Registered programmatically,
    /// never through the serialized configuration.
    #[serde(skip)]
    pub factories: SchemaFactories,
}

impl PluginOptions {
    pub fn single(connection: ConnectionOptions) -> Self {
        Self {
            connection: Some(connection),
            ..Default::default()
        }
    }

    pub fn multi(connections: Vec<ConnectionOptions>) -> Self {
        Self {
            connections: Some(connections),
            ..Default::default()
        }
    }

    pub fn decorations(mut self, decorations: Vec<Decoration>) -> Self {
        self.decorations = decorations;
        self
    }

    /// Registers a schema factory for files whose stem matches `stem`.
    pub fn factory(mut self, stem: impl Into<String>, factory: SchemaFactory) -> Self {
        self.factories.insert(stem.into(), factory);
        self
    }

    /// All descriptors in configured order, whichever shape was used.
    pub(crate) fn descriptors(&self) -> impl Iterator<Item = &ConnectionOptions> {
        self.connection
            .iter()
            .chain(self.connections.iter().flatten())
    }
}

impl std::fmt::Debug for PluginOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginOptions")
            .field("connection", &self.connection)
            .field("connections", &self.connections)
            .field("decorations", &self.decorations)
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
