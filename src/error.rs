//! Typed errors for registration and provisioning.

use thiserror::Error;

/// Errors detected in the plugin options before any connection is attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("exactly one of `connection` or `connections` must be present")]
    ConnectionExclusivity,
    #[error("`connections` must not be empty")]
    EmptyConnections,
    #[error("connection uri must be a non-empty mongodb:// or mongodb+srv:// uri: '{0}'")]
    InvalidUri(String),
    #[error("connection alias must not be blank")]
    BlankAlias,
    #[error("invalid schema pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("duplicate namespace key '{0}' across configured connections")]
    DuplicateKey(String),
}

/// Errors surfaced by `register`. Nothing here is retried: the first failure
/// aborts the whole registration and no partial namespace is exposed.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Driver errors propagate verbatim (DNS, auth, network).
    #[error(transparent)]
    Connection(#[from] mongodb::error::Error),
    #[error("unable to create model for file: {file}")]
    ModelCreation { file: String },
    #[error("unsupported index direction for field '{field}' on model '{model}': expected 1 or -1")]
    UnsupportedIndexDirection { model: String, field: String },
    #[error("plugin {0} already registered")]
    AlreadyRegistered(&'static str),
}

impl PluginError {
    pub fn model_creation(file: impl Into<String>) -> Self {
        Self::ModelCreation { file: file.into() }
    }
}
