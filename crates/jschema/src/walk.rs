//! Mapping of type descriptors to schema nodes.
//!
//! Named types are registered as definitions and cited by `$ref`; anonymous
//! shapes are inlined. A named type is marked in progress before its children
//! are walked, so a type reachable from itself resolves to its own `$ref`.

use std::any::TypeId;

use jschema_core::{
    DEFAULT_TAG, DESCRIPTION_TAG, Field, Kind, Properties, Schema, SchemaType, TypeDescriptor,
    TypeRef,
};
use serde_json::Value;

use crate::error::SchemaError;
use crate::registry::{Schemas, WalkState};

impl Schemas {
    /// Schema for a position of type `ty`.
    pub(crate) fn walk(&mut self, ty: TypeRef) -> Result<Schema, SchemaError> {
        let desc = ty.describe();

        if self.handlers.contains_key(&desc.id) {
            return Ok(self.walk_handler(&desc));
        }
        if let Kind::Optional(inner) = desc.kind {
            return self.walk_optional(inner);
        }
        if desc.is_named() {
            self.walk_named(&desc)
        } else {
            self.content(&desc)
        }
    }

    fn walk_handler(&mut self, desc: &TypeDescriptor) -> Schema {
        if let Some(reference) = self.existing_reference(desc) {
            return reference;
        }

        let name = self.reserve_name(desc);
        let schema = self
            .handlers
            .get(&desc.id)
            .map(|produce| produce())
            .unwrap_or_default();
        tracing::trace!(name = %name, type_name = %desc.qualified_name, "schema produced by handler");

        self.definitions.insert(name.clone(), schema);
        self.states.insert(desc.id, WalkState::Done);
        self.reference(&name)
    }

    fn walk_named(&mut self, desc: &TypeDescriptor) -> Result<Schema, SchemaError> {
        if let Some(reference) = self.existing_reference(desc) {
            return Ok(reference);
        }

        let name = self.reserve_name(desc);
        self.states.insert(desc.id, WalkState::InProgress);

        let mut schema = self.content(desc)?;
        schema.title = Some(name.clone());
        schema.description = Some(desc.qualified_name.clone());
        tracing::debug!(name = %name, kind = %desc.kind, "registered schema definition");

        self.definitions.insert(name.clone(), schema);
        self.states.insert(desc.id, WalkState::Done);
        Ok(self.reference(&name))
    }

    /// `anyOf: [inner, {type: null}]`, never adding a second null branch.
    fn walk_optional(&mut self, inner: TypeRef) -> Result<Schema, SchemaError> {
        let schema = self.walk(inner)?;
        if schema.is_nullable() {
            return Ok(schema);
        }
        Ok(Schema::nullable(schema))
    }

    /// Structural content of `desc`, without definition metadata.
    fn content(&mut self, desc: &TypeDescriptor) -> Result<Schema, SchemaError> {
        let mut schema = match &desc.kind {
            Kind::String => Schema::of_type(SchemaType::String),
            Kind::Number => Schema::of_type(SchemaType::Number),
            Kind::Boolean => Schema::of_type(SchemaType::Boolean),
            Kind::Any => Schema::of_type(SchemaType::Object),
            Kind::Seq(item) => Schema::array(self.walk(*item)?),
            Kind::Array { item, len } => Schema {
                min_items: Some(*len),
                max_items: Some(*len),
                ..Schema::array(self.walk(*item)?)
            },
            Kind::Map { key, value } => self.walk_map(desc, *key, *value)?,
            Kind::Struct(fields) => self.walk_struct(desc, fields)?,
            Kind::Optional(inner) => self.walk_optional(*inner)?,
            Kind::Function | Kind::Channel => {
                return Err(SchemaError::UnsupportedType {
                    type_name: desc.qualified_name.clone(),
                    reason: format!("{} values have no JSON representation", desc.kind),
                });
            }
        };

        if !desc.enum_values.is_empty() {
            schema.enum_values = Some(desc.enum_values.clone());
        }
        Ok(schema)
    }

    fn walk_map(
        &mut self,
        desc: &TypeDescriptor,
        key: TypeRef,
        value: TypeRef,
    ) -> Result<Schema, SchemaError> {
        let key_desc = key.describe();
        if !key_desc.kind.is_string_like() {
            return Err(SchemaError::UnsupportedType {
                type_name: desc.qualified_name.clone(),
                reason: format!(
                    "map keys must be strings, found {} key {}",
                    key_desc.kind, key_desc.qualified_name
                ),
            });
        }

        let mut pattern_properties = Properties::new();
        pattern_properties.insert(String::new(), self.walk(value)?);
        Ok(Schema {
            schema_type: Some(SchemaType::Object),
            pattern_properties: Some(pattern_properties),
            ..Schema::default()
        })
    }

    fn walk_struct(
        &mut self,
        owner: &TypeDescriptor,
        fields: &[Field],
    ) -> Result<Schema, SchemaError> {
        let mut object = ObjectShape::default();
        let mut embedding = vec![owner.id];
        self.collect_fields(owner, fields, false, &mut embedding, &mut object)?;

        Ok(Schema {
            schema_type: Some(SchemaType::Object),
            properties: (!object.properties.is_empty()).then_some(object.properties),
            required: (!object.required.is_empty()).then_some(object.required),
            additional_properties: Some(false),
            ..Schema::default()
        })
    }

    /// Add `fields` to `object`. Under an optional embedding nothing is required.
    fn collect_fields(
        &mut self,
        owner: &TypeDescriptor,
        fields: &[Field],
        optional: bool,
        embedding: &mut Vec<TypeId>,
        object: &mut ObjectShape,
    ) -> Result<(), SchemaError> {
        for field in fields {
            let tag = field.json_tag().unwrap_or_default();
            if tag.ignore {
                continue;
            }
            // A named embedded field is an ordinary property.
            if field.embedded && tag.name.is_empty() {
                self.splice_embedded(owner, field, optional, embedding, object)?;
                continue;
            }

            let name = if tag.name.is_empty() {
                field.name.clone()
            } else {
                tag.name.clone()
            };
            let nullable = matches!(field.ty.describe().kind, Kind::Optional(_));

            let mut property = self.walk(field.ty)?;
            if tag.string {
                self.encode_as_string(&mut property);
            }
            annotate(owner, field, &mut property)?;

            if object.properties.insert(name.clone(), property).is_some() {
                return Err(duplicate(owner, name));
            }
            if !(optional || tag.omit_empty || nullable) {
                object.required.push(name);
            }
        }
        Ok(())
    }

    /// Splice the fields of an embedded struct into its parent, in place.
    ///
    /// Works from the embedded type's descriptor, so it does not matter
    /// whether that type's own definition is still being walked.
    fn splice_embedded(
        &mut self,
        owner: &TypeDescriptor,
        field: &Field,
        optional: bool,
        embedding: &mut Vec<TypeId>,
        object: &mut ObjectShape,
    ) -> Result<(), SchemaError> {
        let (ty, nested_optional) = match field.ty.describe().kind {
            Kind::Optional(inner) => (inner, true),
            _ => (field.ty, false),
        };
        let desc = ty.describe();
        let Kind::Struct(fields) = &desc.kind else {
            return Err(SchemaError::EmbeddedField {
                field: field.name.clone(),
                type_name: owner.qualified_name.clone(),
                reason: format!("{} is a {}, not a struct", desc.qualified_name, desc.kind),
            });
        };
        if embedding.contains(&desc.id) {
            return Err(SchemaError::EmbeddedField {
                field: field.name.clone(),
                type_name: owner.qualified_name.clone(),
                reason: format!("{} embeds itself", desc.qualified_name),
            });
        }

        embedding.push(desc.id);
        self.collect_fields(owner, fields, optional || nested_optional, embedding, object)?;
        embedding.pop();

        // The embedded type keeps its own definition.
        if desc.is_named() {
            self.walk(ty)?;
        }
        Ok(())
    }

    /// Rewrite number and boolean nodes to `string`, following `$ref` to
    /// named scalars.
    fn encode_as_string(&self, schema: &mut Schema) {
        if let Some(path) = schema.ref_path.as_deref() {
            let scalar = self
                .definition_at(path)
                .is_some_and(|target| is_string_encodable(target.schema_type));
            if scalar {
                *schema = Schema::of_type(SchemaType::String);
            }
            return;
        }
        if is_string_encodable(schema.schema_type) {
            schema.schema_type = Some(SchemaType::String);
        }
        for alternative in schema.any_of.iter_mut().flatten() {
            self.encode_as_string(alternative);
        }
    }

    fn definition_at(&self, path: &str) -> Option<&Schema> {
        let name = path.strip_prefix(self.prefix())?.strip_prefix('/')?;
        self.definitions.get(name)
    }
}

/// Properties and required names of an object under construction.
#[derive(Default)]
struct ObjectShape {
    properties: Properties,
    required: Vec<String>,
}

const fn is_string_encodable(schema_type: Option<SchemaType>) -> bool {
    matches!(schema_type, Some(SchemaType::Number | SchemaType::Boolean))
}

fn duplicate(owner: &TypeDescriptor, property: String) -> SchemaError {
    SchemaError::DuplicateProperty {
        property,
        type_name: owner.qualified_name.clone(),
    }
}

/// Apply the description and default tags of `field` to its property.
fn annotate(owner: &TypeDescriptor, field: &Field, property: &mut Schema) -> Result<(), SchemaError> {
    let description = field.tags.get(DESCRIPTION_TAG);
    let default = field
        .tags
        .get(DEFAULT_TAG)
        .map(|raw| {
            serde_json::from_str::<Value>(raw).map_err(|e| SchemaError::MalformedTag {
                tag: DEFAULT_TAG.to_string(),
                field: field.name.clone(),
                type_name: owner.qualified_name.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()?;

    if description.is_none() && default.is_none() {
        return Ok(());
    }
    // A reference node carries nothing but `$ref`.
    if property.is_reference() {
        *property = Schema::any_of(vec![std::mem::take(property)]);
    }
    if let Some(text) = description {
        property.description = Some(text.to_string());
    }
    if default.is_some() {
        property.default = default;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use jschema_core::Describe;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Meters;

    impl Describe for Meters {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::named::<Self>(Kind::Number)
        }
    }

    struct Color;

    impl Describe for Color {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::named::<Self>(Kind::String).with_enum(["red", "green"])
        }
    }

    struct Base;

    impl Describe for Base {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::named::<Self>(Kind::Struct(vec![
                Field::new::<u64>("ID").json("id"),
                Field::new::<Option<String>>("Note").json("note"),
            ]))
        }
    }

    struct Wrapper;

    impl Describe for Wrapper {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::named::<Self>(Kind::Struct(vec![
                Field::new::<String>("Name").json("name"),
                Field::embed::<Base>(),
                Field::new::<bool>("Active").json("active"),
            ]))
        }
    }

    struct Clash;

    impl Describe for Clash {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::named::<Self>(Kind::Struct(vec![
                Field::new::<u64>("Key").json("id"),
                Field::embed::<Base>(),
            ]))
        }
    }

    fn value_of(schemas: &Schemas, name: &str) -> Value {
        serde_json::to_value(schemas.get(name).unwrap()).unwrap()
    }

    #[test]
    fn anonymous_primitives_are_inline() {
        let mut schemas = Schemas::new("");
        assert_eq!(
            schemas.define::<String>().unwrap(),
            Schema::of_type(SchemaType::String)
        );
        assert_eq!(
            schemas.define::<f64>().unwrap(),
            Schema::of_type(SchemaType::Number)
        );
        assert!(schemas.is_empty());
    }

    #[test]
    fn named_primitive_gets_definition() {
        let mut schemas = Schemas::new("");
        let reference = schemas.define::<Meters>().unwrap();

        assert_eq!(reference, Schema::reference("#/$defs/Meters"));
        assert_eq!(
            value_of(&schemas, "Meters"),
            json!({
                "type": "number",
                "title": "Meters",
                "description": std::any::type_name::<Meters>(),
            })
        );
    }

    #[test]
    fn enum_values_are_emitted() {
        let mut schemas = Schemas::new("");
        schemas.define::<Color>().unwrap();
        assert_eq!(value_of(&schemas, "Color")["enum"], json!(["red", "green"]));
    }

    #[test]
    fn nullable_is_never_doubled() {
        let mut schemas = Schemas::new("");
        let schema = schemas.define::<Option<Option<Meters>>>().unwrap();
        assert_eq!(
            serde_json::to_value(schema).unwrap(),
            json!({"anyOf": [{"$ref": "#/$defs/Meters"}, {"type": "null"}]})
        );
    }

    #[test]
    fn string_keyed_map_uses_pattern_properties() {
        let mut schemas = Schemas::new("");
        let schema = schemas.define::<HashMap<String, bool>>().unwrap();
        assert_eq!(
            serde_json::to_value(schema).unwrap(),
            json!({"type": "object", "patternProperties": {"": {"type": "boolean"}}})
        );
    }

    #[test]
    fn non_string_map_keys_fail() {
        let mut schemas = Schemas::new("");
        match schemas.define::<HashMap<u32, String>>().unwrap_err() {
            SchemaError::UnsupportedType { reason, .. } => {
                assert!(reason.contains("map keys must be strings"));
            }
            other => panic!("expected unsupported type, got {other}"),
        }
    }

    #[test]
    fn channels_fail() {
        let mut schemas = Schemas::new("");
        let err = schemas
            .define::<std::sync::mpsc::Sender<u8>>()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedType { .. }));
    }

    #[test]
    fn embedded_fields_are_spliced_in_place() {
        let mut schemas = Schemas::new("");
        schemas.define::<Wrapper>().unwrap();

        let wrapper = schemas.get("Wrapper").unwrap();
        let keys: Vec<&str> = wrapper
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["name", "id", "note", "active"]);
        assert_eq!(
            wrapper.required,
            Some(vec!["name".to_string(), "id".to_string(), "active".to_string()])
        );
        // The embedded type is still a standalone definition.
        assert!(schemas.get("Base").is_some());
    }

    #[test]
    fn embedded_clash_is_reported() {
        let mut schemas = Schemas::new("");
        let err = schemas.define::<Clash>().unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateProperty { ref property, .. } if property == "id"
        ));
    }

    #[test]
    fn string_hint_rewrites_scalar_types() {
        let schemas = Schemas::new("");
        let mut property = Schema::nullable(Schema::of_type(SchemaType::Number));
        schemas.encode_as_string(&mut property);
        assert_eq!(
            serde_json::to_value(property).unwrap(),
            json!({"anyOf": [{"type": "string"}, {"type": "null"}]})
        );
    }

    #[test]
    fn string_hint_follows_references_to_scalars() {
        let mut schemas = Schemas::new("");
        let mut meters = schemas.define::<Option<Meters>>().unwrap();
        let mut color = schemas.define::<Color>().unwrap();

        schemas.encode_as_string(&mut meters);
        schemas.encode_as_string(&mut color);
        assert_eq!(
            serde_json::to_value(meters).unwrap(),
            json!({"anyOf": [{"type": "string"}, {"type": "null"}]})
        );
        // Strings are already string-encoded.
        assert_eq!(color, Schema::reference("#/$defs/Color"));
    }

    #[test]
    fn embedding_a_scalar_fails() {
        struct Tagged;

        impl Describe for Tagged {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::named::<Self>(Kind::Struct(vec![Field::embed::<Meters>()]))
            }
        }

        let mut schemas = Schemas::new("");
        let err = schemas.define::<Tagged>().unwrap_err();
        assert!(matches!(err, SchemaError::EmbeddedField { .. }));
        assert!(schemas.is_empty());
    }

    #[test]
    fn self_embedding_fails() {
        struct Loop;

        impl Describe for Loop {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::named::<Self>(Kind::Struct(vec![
                    Field::new::<u8>("Depth"),
                    Field::embed::<Option<Box<Loop>>>(),
                ]))
            }
        }

        let mut schemas = Schemas::new("");
        match schemas.define::<Loop>().unwrap_err() {
            SchemaError::EmbeddedField { reason, .. } => assert!(reason.contains("embeds itself")),
            other => panic!("expected embedded field error, got {other}"),
        }
    }

    #[test]
    fn annotations_wrap_reference_nodes() {
        let owner = Wrapper::describe();
        let field = Field::new::<Base>("Base").description("shared fields");
        let mut property = Schema::reference("#/$defs/Base");

        annotate(&owner, &field, &mut property).unwrap();
        assert_eq!(
            serde_json::to_value(property).unwrap(),
            json!({"description": "shared fields", "anyOf": [{"$ref": "#/$defs/Base"}]})
        );
    }

    #[test]
    fn malformed_default_names_field_and_type() {
        let owner = Wrapper::describe();
        let field = Field::new::<String>("Name").default_value("jack");
        let mut property = Schema::of_type(SchemaType::String);

        let err = annotate(&owner, &field, &mut property).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`default`"));
        assert!(message.contains("Name"));
        assert!(message.contains("Wrapper"));
    }
}
