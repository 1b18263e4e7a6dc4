//! Struct fields and their metadata tags.

use indexmap::IndexMap;

use crate::describe::{Describe, TypeRef, short_name};

/// Tag key carrying `name[,omitempty][,string]` or `-`.
pub const JSON_TAG: &str = "json";
/// Tag key carrying the property description.
pub const DESCRIPTION_TAG: &str = "description";
/// Tag key carrying a JSON literal default value.
pub const DEFAULT_TAG: &str = "default";

/// Ordered key/value metadata attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(IndexMap<&'static str, &'static str>);

impl Tags {
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Set `key`, replacing any earlier value in place.
    pub fn insert(&mut self, key: &'static str, value: &'static str) {
        self.0.insert(key, value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.0.get(key).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(key, value)| (*key, *value))
    }
}

/// Parsed value of the [`JSON_TAG`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonTag {
    /// Property name override; empty keeps the declared name.
    pub name: String,
    /// `-`: the field is not serialized at all.
    pub ignore: bool,
    /// `omitempty`: the field may be absent.
    pub omit_empty: bool,
    /// `string`: the value is encoded as a JSON string.
    pub string: bool,
}

impl JsonTag {
    /// Parse a raw tag value. An empty value yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        if raw == "-" {
            return Some(Self {
                ignore: true,
                ..Self::default()
            });
        }

        let mut parts = raw.split(',');
        let name = parts.next().unwrap_or_default().trim().to_string();
        let mut tag = Self {
            name,
            ..Self::default()
        };
        for option in parts {
            match option.trim() {
                "omitempty" => tag.omit_empty = true,
                "string" => tag.string = true,
                _ => {}
            }
        }
        Some(tag)
    }
}

/// One field of a struct descriptor.
#[derive(Debug, Clone)]
pub struct Field {
    /// Declared field name.
    pub name: String,
    pub ty: TypeRef,
    pub tags: Tags,
    /// Embedded fields have their child properties spliced into the parent.
    pub embedded: bool,
}

impl Field {
    #[must_use]
    pub fn new<T: Describe + ?Sized>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::of::<T>(),
            tags: Tags::new(),
            embedded: false,
        }
    }

    /// An embedded field, named after its type.
    #[must_use]
    pub fn embed<T: Describe + ?Sized>() -> Self {
        let qualified = T::qualified_name();
        Self {
            embedded: true,
            ..Self::new::<T>(short_name(&qualified))
        }
    }

    #[must_use]
    pub fn tag(mut self, key: &'static str, value: &'static str) -> Self {
        self.tags.insert(key, value);
        self
    }

    #[must_use]
    pub fn json(self, value: &'static str) -> Self {
        self.tag(JSON_TAG, value)
    }

    #[must_use]
    pub fn description(self, value: &'static str) -> Self {
        self.tag(DESCRIPTION_TAG, value)
    }

    #[must_use]
    pub fn default_value(self, value: &'static str) -> Self {
        self.tag(DEFAULT_TAG, value)
    }

    #[must_use]
    pub fn json_tag(&self) -> Option<JsonTag> {
        self.tags.get(JSON_TAG).and_then(JsonTag::parse)
    }
}
