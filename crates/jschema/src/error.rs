//! Schema registry error types.

use jschema_config::ConfigError;
use thiserror::Error;

/// Errors from the schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The walker reached a kind with no JSON representation.
    #[error("Unsupported type {type_name}: {reason}")]
    UnsupportedType { type_name: String, reason: String },

    /// A field tag value could not be parsed.
    #[error("Malformed `{tag}` tag on field {field} of {type_name}: {reason}")]
    MalformedTag {
        tag: String,
        field: String,
        type_name: String,
        reason: String,
    },

    /// An embedded field could not be flattened into its parent.
    #[error("Embedded field {field} of {type_name} cannot be flattened: {reason}")]
    EmbeddedField {
        field: String,
        type_name: String,
        reason: String,
    },

    /// Two fields of one struct expose the same property name.
    #[error("Duplicate property '{property}' in {type_name}")]
    DuplicateProperty { property: String, type_name: String },

    /// The requested type has no definition in the registry.
    #[error("Schema not defined: {0}")]
    NotDefined(String),

    /// Converting a literal or exporting the registry failed.
    #[error("Schema serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
