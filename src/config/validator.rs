//! Structural validation of plugin options: shape exclusivity and per-descriptor rules.

use crate::config::{ConnectionOptions, PluginOptions};
use crate::error::ConfigError;

pub fn validate(options: &PluginOptions) -> Result<(), ConfigError> {
    match (&options.connection, &options.connections) {
        (Some(_), Some(_)) | (None, None) => return Err(ConfigError::ConnectionExclusivity),
        (None, Some(list)) if list.is_empty() => return Err(ConfigError::EmptyConnections),
        _ => {}
    }

    for descriptor in options.descriptors() {
        validate_descriptor(descriptor)?;
    }
    Ok(())
}

fn validate_descriptor(descriptor: &ConnectionOptions) -> Result<(), ConfigError> {
    let uri = descriptor.uri.trim();
    if !uri.starts_with("mongodb://") && !uri.starts_with("mongodb+srv://") {
        return Err(ConfigError::InvalidUri(descriptor.uri.clone()));
    }
    if let Some(alias) = &descriptor.alias {
        if alias.trim().is_empty() {
            return Err(ConfigError::BlankAlias);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(uri: &str) -> ConnectionOptions {
        ConnectionOptions::new(uri)
    }

    #[test]
    fn rejects_both_connection_shapes() {
        let options = PluginOptions {
            connection: Some(conn("mongodb://localhost:27017/test")),
            connections: Some(vec![conn("mongodb://localhost:27017/test-2")]),
            ..Default::default()
        };
        assert!(matches!(
            validate(&options),
            Err(ConfigError::ConnectionExclusivity)
        ));
    }

    #[test]
    fn rejects_neither_connection_shape() {
        let options = PluginOptions::default();
        assert!(matches!(
            validate(&options),
            Err(ConfigError::ConnectionExclusivity)
        ));
    }

    #[test]
    fn rejects_empty_connections_list() {
        let options = PluginOptions::multi(vec![]);
        assert!(matches!(
            validate(&options),
            Err(ConfigError::EmptyConnections)
        ));
    }

    #[test]
    fn rejects_non_mongodb_uri() {
        let options = PluginOptions::single(conn("postgres://localhost/test"));
        assert!(matches!(validate(&options), Err(ConfigError::InvalidUri(_))));

        let options = PluginOptions::single(conn(""));
        assert!(matches!(validate(&options), Err(ConfigError::InvalidUri(_))));
    }

    #[test]
    fn rejects_blank_alias() {
        let options =
            PluginOptions::single(conn("mongodb://localhost:27017/test").alias("   "));
        assert!(matches!(validate(&options), Err(ConfigError::BlankAlias)));
    }

    #[test]
    fn accepts_single_and_multi_shapes() {
        let single = PluginOptions::single(conn("mongodb://localhost:27017/test"));
        assert!(validate(&single).is_ok());

        let multi = PluginOptions::multi(vec![
            conn("mongodb://localhost:27017/test-1").alias("safebox"),
            conn("mongodb+srv://cluster.example.com/test-2"),
        ]);
        assert!(validate(&multi).is_ok());
    }
}
