//! JSON Schema node model.
//!
//! A [`Schema`] is either a reference node (only `$ref` set) or a content
//! node. Property maps keep insertion order so emitted objects list fields in
//! declaration order.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema `type` keyword values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl SchemaType {
    /// The schema type a literal JSON value belongs to.
    #[must_use]
    pub const fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single JSON Schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Citation of another definition. Set alone on reference nodes.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Format hint for strings (e.g. `date-time`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,

    /// Non-optional property names in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    /// Map values, keyed by the empty pattern that matches every key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<Properties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,
}

impl Schema {
    /// A reference node citing `path`.
    #[must_use]
    pub fn reference(path: impl Into<String>) -> Self {
        Self {
            ref_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A content node carrying only a `type`.
    #[must_use]
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// `{type: array, items: item}`.
    #[must_use]
    pub fn array(item: Self) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(item)),
            ..Self::default()
        }
    }

    /// `{anyOf: [inner, {type: null}]}`.
    #[must_use]
    pub fn nullable(inner: Self) -> Self {
        Self::any_of(vec![inner, Self::of_type(SchemaType::Null)])
    }

    /// `{anyOf: alternatives}`.
    #[must_use]
    pub fn any_of(alternatives: Vec<Self>) -> Self {
        Self {
            any_of: Some(alternatives),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.ref_path.is_some()
    }

    /// Whether this node is a union with an explicit `{type: null}` branch.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.any_of.as_ref().is_some_and(|alternatives| {
            alternatives
                .iter()
                .any(|alt| alt.schema_type == Some(SchemaType::Null) && alt.ref_path.is_none())
        })
    }
}

/// Insertion-ordered mapping from property name to [`Schema`].
pub type Properties = IndexMap<String, Schema>;
