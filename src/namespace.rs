//! Namespace assembly and exposure onto the host's extension points.

use crate::client::MongoConnection;
use crate::config::{Decoration, ResolvedConnection};
use crate::error::{ConfigError, PluginError};
use crate::server::Server;
use std::collections::HashMap;
use std::sync::Arc;

/// One provisioned connection and its bound models.
#[derive(Clone)]
pub struct ProvisionedConnection<C: MongoConnection> {
    pub connection: C,
    pub models: HashMap<String, C::Model>,
}

impl<C: MongoConnection> ProvisionedConnection<C> {
    pub fn model(&self, name: &str) -> Option<&C::Model> {
        self.models.get(name)
    }
}

/// The exposed result. A single configured descriptor keeps the historical
/// flat `{connection, models}` shape; several descriptors yield a mapping
/// keyed by alias-else-intrinsic-name. The enum makes the cardinality switch
/// explicit at the type level.
#[derive(Clone)]
pub enum Namespace<C: MongoConnection> {
    Single(ProvisionedConnection<C>),
    Keyed(HashMap<String, ProvisionedConnection<C>>),
}

impl<C: MongoConnection> Namespace<C> {
    /// The flat record, when exactly one connection was configured.
    pub fn single(&self) -> Option<&ProvisionedConnection<C>> {
        match self {
            Namespace::Single(mongo) => Some(mongo),
            Namespace::Keyed(_) => None,
        }
    }

    /// A keyed entry, when several connections were configured.
    pub fn get(&self, key: &str) -> Option<&ProvisionedConnection<C>> {
        match self {
            Namespace::Single(_) => None,
            Namespace::Keyed(map) => map.get(key),
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            Namespace::Single(_) => Vec::new(),
            Namespace::Keyed(map) => map.keys().map(String::as_str).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Namespace::Single(_) => 1,
            Namespace::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies the single-vs-keyed shape rule. Duplicate resolved keys across
/// descriptors fail fast instead of silently overwriting.
pub fn assemble<C: MongoConnection>(
    mut provisioned: Vec<(ResolvedConnection, ProvisionedConnection<C>)>,
) -> Result<Namespace<C>, PluginError> {
    if provisioned.len() == 1 {
        if let Some((_, mongo)) = provisioned.pop() {
            return Ok(Namespace::Single(mongo));
        }
    }

    let mut map = HashMap::new();
    for (settings, mongo) in provisioned {
        let key = settings
            .alias
            .clone()
            .unwrap_or_else(|| mongo.connection.name().to_string());
        if map.insert(key.clone(), mongo).is_some() {
            return Err(ConfigError::DuplicateKey(key).into());
        }
    }
    Ok(Namespace::Keyed(map))
}

/// Stores the namespace in the server's application state (always) and
/// attaches it to every configured extension point.
pub fn expose<C: MongoConnection>(
    server: &Server,
    decorations: &[Decoration],
    namespace: Arc<Namespace<C>>,
) {
    server.set_app_state(namespace.clone());
    for point in decorations {
        server.decorate(*point, namespace.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginError;
    use crate::schema::SchemaDefinition;
    use async_trait::async_trait;
    use serde_json::Map;

    #[derive(Clone)]
    struct StubConnection {
        name: String,
    }

    #[async_trait]
    impl MongoConnection for StubConnection {
        type Model = String;

        fn name(&self) -> &str {
            &self.name
        }

        async fn model(
            &self,
            name: &str,
            _schema: SchemaDefinition,
        ) -> Result<String, PluginError> {
            Ok(name.to_string())
        }
    }

    fn provisioned(
        alias: Option<&str>,
        name: &str,
    ) -> (ResolvedConnection, ProvisionedConnection<StubConnection>) {
        (
            ResolvedConnection {
                uri: format!("mongodb://localhost:27017/{name}"),
                alias: alias.map(str::to_string),
                schema_patterns: Vec::new(),
                schemas: Default::default(),
                client_options: Map::new(),
            },
            ProvisionedConnection {
                connection: StubConnection {
                    name: name.to_string(),
                },
                models: HashMap::new(),
            },
        )
    }

    #[test]
    fn one_descriptor_assembles_flat() {
        let namespace = assemble(vec![provisioned(None, "test")]).unwrap();
        let single = namespace.single().expect("flat shape");
        assert_eq!(single.connection.name(), "test");
        assert!(single.models.is_empty());
        assert!(namespace.get("test").is_none());
    }

    #[test]
    fn several_descriptors_assemble_keyed_by_intrinsic_name() {
        let namespace = assemble(vec![
            provisioned(None, "test-1"),
            provisioned(None, "test-2"),
        ])
        .unwrap();
        assert!(namespace.single().is_none());
        assert_eq!(namespace.len(), 2);
        assert_eq!(namespace.get("test-1").unwrap().connection.name(), "test-1");
        assert_eq!(namespace.get("test-2").unwrap().connection.name(), "test-2");
    }

    #[test]
    fn alias_takes_precedence_over_intrinsic_name() {
        let namespace = assemble(vec![
            provisioned(Some("safebox"), "test-1"),
            provisioned(None, "test-2"),
        ])
        .unwrap();
        assert!(namespace.get("test-1").is_none());
        assert_eq!(namespace.get("safebox").unwrap().connection.name(), "test-1");
    }

    #[test]
    fn duplicate_keys_fail_fast() {
        let result = assemble(vec![
            provisioned(Some("db"), "test-1"),
            provisioned(Some("db"), "test-2"),
        ]);
        assert!(matches!(
            result,
            Err(PluginError::Config(ConfigError::DuplicateKey(key))) if key == "db"
        ));
    }
}
