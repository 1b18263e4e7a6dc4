//! Helpers for post-processing emitted schemas: unions, constants and enums.

use jschema_core::{Schema, SchemaType, TypeRef};
use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::registry::Schemas;

impl Schemas {
    /// `{anyOf: [...]}` with one alternative per type, defining each as needed.
    ///
    /// # Errors
    ///
    /// Same as [`Schemas::define`]. On error no alternative is registered.
    pub fn any_of(&mut self, types: &[TypeRef]) -> Result<Schema, SchemaError> {
        self.transaction(|schemas| {
            let alternatives = types
                .iter()
                .map(|ty| schemas.walk(*ty))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Schema::any_of(alternatives))
        })
    }
}

/// A node accepting exactly `value`.
///
/// # Errors
///
/// Returns `SchemaError::Serialization` if `value` cannot be converted to JSON.
pub fn constant<V: Serialize>(value: V) -> Result<Schema, SchemaError> {
    let value = serde_json::to_value(value)?;
    Ok(Schema {
        schema_type: Some(SchemaType::of_value(&value)),
        const_value: Some(value),
        ..Schema::default()
    })
}

/// A node accepting any of `values`. The `type` is set when all values share one.
///
/// # Errors
///
/// Returns `SchemaError::Serialization` if a value cannot be converted to JSON.
pub fn enumeration<I, V>(values: I) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = V>,
    V: Serialize,
{
    let values = to_values(values)?;
    let mut types = values.iter().map(SchemaType::of_value);
    let schema_type = types.next().filter(|first| types.all(|other| other == *first));
    Ok(Schema {
        schema_type,
        enum_values: Some(values),
        ..Schema::default()
    })
}

/// Convert literals to JSON values, e.g. for [`Schema::enum_values`].
///
/// # Errors
///
/// Returns `SchemaError::Serialization` if a value cannot be converted to JSON.
pub fn to_values<I, V>(values: I) -> Result<Vec<Value>, SchemaError>
where
    I: IntoIterator<Item = V>,
    V: Serialize,
{
    values
        .into_iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(SchemaError::from)
}
