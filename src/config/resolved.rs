//! Configuration resolver: one fully-defaulted descriptor per requested connection.

use crate::config::{validate, Decoration, PluginOptions};
use crate::error::ConfigError;
use crate::schema::SchemaDefinition;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// A descriptor after validation and defaulting. `client_options` carries the
/// baseline defaults merged beneath the user's values.
#[derive(Clone, Debug)]
pub struct ResolvedConnection {
    pub uri: String,
    pub alias: Option<String>,
    pub schema_patterns: Vec<String>,
    pub schemas: BTreeMap<String, SchemaDefinition>,
    pub client_options: Map<String, Value>,
}

#[derive(Clone, Debug)]
pub struct ResolvedOptions {
    pub connections: Vec<ResolvedConnection>,
    pub decorations: Vec<Decoration>,
}

/// Baseline options merged beneath every descriptor. The flag enables
/// forward-compatible URI parsing; user-supplied values win on conflict.
fn default_client_options() -> Map<String, Value> {
    let Value::Object(map) = json!({ "useNewUrlParser": true }) else {
        unreachable!()
    };
    map
}

/// Validates the options and produces the ordered descriptor list.
/// Defaulting itself cannot fail; every error here is a validation error.
pub fn resolve(options: &PluginOptions) -> Result<ResolvedOptions, ConfigError> {
    validate(options)?;

    let connections = options
        .descriptors()
        .map(|descriptor| ResolvedConnection {
            uri: descriptor.uri.trim().to_string(),
            alias: descriptor.alias.as_ref().map(|a| a.trim().to_string()),
            schema_patterns: descriptor.schema_patterns.clone(),
            schemas: descriptor.schemas.clone(),
            client_options: apply_to_defaults(
                &default_client_options(),
                &descriptor.client_options,
            ),
        })
        .collect();

    Ok(ResolvedOptions {
        connections,
        decorations: options.decorations.clone(),
    })
}

/// Deep merge: override values win, nested objects merge key by key instead
/// of replacing the default object wholesale.
fn apply_to_defaults(defaults: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        match (merged.get_mut(key), value) {
            (Some(Value::Object(base)), Value::Object(patch)) => {
                *base = apply_to_defaults(base, patch);
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
