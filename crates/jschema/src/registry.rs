//! The schema registry.
//!
//! `Schemas` owns every emitted definition, keyed by a display name that is
//! unique within the registry. Types are identified by [`TypeId`]; a type's
//! display name never changes once reserved.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use jschema_config::{DEFAULT_REF_PREFIX, SchemasConfig};
use jschema_core::{Describe, Schema, TypeDescriptor, TypeRef};

use crate::error::SchemaError;

/// Produces the schema of a type in place of structural walking.
pub(crate) type Handler = Box<dyn Fn() -> Schema>;

/// Walk progress of a named type. Absent from the map means unseen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WalkState {
    InProgress,
    Done,
}

/// Registry of named JSON Schema definitions.
///
/// Not synchronized: mutate from one owner, or keep one registry per thread.
pub struct Schemas {
    prefix: String,
    pretty: bool,
    pub(crate) names: HashMap<TypeId, String>,
    pub(crate) owners: HashMap<String, TypeId>,
    pub(crate) states: HashMap<TypeId, WalkState>,
    pub(crate) definitions: HashMap<String, Schema>,
    pub(crate) handlers: HashMap<TypeId, Handler>,
    /// Types reserved by the walk in flight, undone if it fails.
    journal: Vec<TypeId>,
}

impl Schemas {
    /// Create an empty registry citing definitions under `prefix`.
    ///
    /// An empty prefix means `#/$defs`. A trailing `/` is dropped.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = match prefix.trim_end_matches('/') {
            "" => DEFAULT_REF_PREFIX.to_string(),
            trimmed => trimmed.to_string(),
        };

        Self {
            prefix,
            pretty: true,
            names: HashMap::new(),
            owners: HashMap::new(),
            states: HashMap::new(),
            definitions: HashMap::new(),
            handlers: HashMap::new(),
            journal: Vec::new(),
        }
    }

    /// Build a registry from loaded configuration, installing the enabled
    /// built-in handlers.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Config` if the configuration fails validation.
    pub fn from_config(config: &SchemasConfig) -> Result<Self, SchemaError> {
        config.validate()?;
        let mut schemas = Self::new(config.ref_prefix.as_str()).with_pretty(config.pretty);
        schemas.install_handlers(&config.handlers);
        Ok(schemas)
    }

    /// Choose pretty or compact output for [`Schemas::to_json_string`].
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Citation string for the definition called `name`.
    #[must_use]
    pub fn ref_path(&self, name: &str) -> String {
        format!("{}/{name}", self.prefix)
    }

    pub(crate) fn reference(&self, name: &str) -> Schema {
        Schema::reference(self.ref_path(name))
    }

    /// Walk `T` and return the schema for a position of that type: a `$ref`
    /// for named types, inline content for anonymous shapes.
    ///
    /// Defining the same type again returns the same reference.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnsupportedType` for kinds with no JSON form,
    /// `SchemaError::MalformedTag` for unparsable field metadata, and the
    /// flattening errors for bad embedded fields. A failed define leaves the
    /// registry as it was.
    pub fn define<T: Describe + ?Sized>(&mut self) -> Result<Schema, SchemaError> {
        self.define_type(TypeRef::of::<T>())
    }

    /// [`Schemas::define`] for the type of `sample`.
    ///
    /// # Errors
    ///
    /// Same as [`Schemas::define`].
    pub fn define_value<T: Describe>(&mut self, _sample: &T) -> Result<Schema, SchemaError> {
        self.define::<T>()
    }

    /// [`Schemas::define`] for a type handle.
    ///
    /// # Errors
    ///
    /// Same as [`Schemas::define`].
    pub fn define_type(&mut self, ty: TypeRef) -> Result<Schema, SchemaError> {
        self.transaction(|schemas| schemas.walk(ty))
    }

    /// Mutable access to the content schema registered for `T`.
    ///
    /// Returns `None` if `T` was never defined.
    pub fn peek_schema<T: Describe + ?Sized>(&mut self) -> Option<&mut Schema> {
        let id = T::describe().id;
        let name = self.names.get(&id)?;
        self.definitions.get_mut(name)
    }

    /// Replace the description of `T`'s definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotDefined` if `T` was never defined.
    pub fn set_description<T: Describe + ?Sized>(
        &mut self,
        description: impl Into<String>,
    ) -> Result<(), SchemaError> {
        let schema = self
            .peek_schema::<T>()
            .ok_or_else(|| SchemaError::NotDefined(T::qualified_name()))?;
        schema.description = Some(description.into());
        Ok(())
    }

    /// Display name assigned to `T`, if it has been defined.
    #[must_use]
    pub fn name_of<T: Describe + ?Sized>(&self) -> Option<&str> {
        self.names.get(&T::describe().id).map(String::as_str)
    }

    /// The `$ref` node citing `T`'s definition, if it has been defined.
    #[must_use]
    pub fn reference_of<T: Describe + ?Sized>(&self) -> Option<Schema> {
        self.name_of::<T>().map(|name| self.reference(name))
    }

    /// The definition registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All definitions keyed by display name.
    #[must_use]
    pub fn json(&self) -> BTreeMap<String, Schema> {
        self.definitions
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect()
    }

    /// Serialize [`Schemas::json`], pretty-printed unless configured otherwise.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Serialization` if a literal value fails to serialize.
    pub fn to_json_string(&self) -> Result<String, SchemaError> {
        let definitions = self.json();
        let text = if self.pretty {
            serde_json::to_string_pretty(&definitions)?
        } else {
            serde_json::to_string(&definitions)?
        };
        Ok(text)
    }

    /// The `$ref` for a type whose walk has already started.
    pub(crate) fn existing_reference(&self, desc: &TypeDescriptor) -> Option<Schema> {
        let state = self.states.get(&desc.id)?;
        let name = self.names.get(&desc.id)?;
        tracing::trace!(name = %name, ?state, "reusing schema reference");
        Some(self.reference(name))
    }

    /// Reserve a unique display name for `desc`, suffixing the smallest free
    /// integer when the base name belongs to another type.
    pub(crate) fn reserve_name(&mut self, desc: &TypeDescriptor) -> String {
        if let Some(name) = self.names.get(&desc.id) {
            return name.clone();
        }

        let base = desc.display_name();
        let mut name = base.to_string();
        let mut suffix = 0_usize;
        while self.owners.contains_key(&name) {
            suffix += 1;
            name = format!("{base}{suffix}");
        }
        if suffix > 0 {
            tracing::debug!(
                base,
                name = %name,
                type_name = %desc.qualified_name,
                "display name taken, using suffixed name"
            );
        }

        self.owners.insert(name.clone(), desc.id);
        self.names.insert(desc.id, name.clone());
        self.journal.push(desc.id);
        name
    }

    /// Run a walk, undoing every reservation it made if it fails.
    pub(crate) fn transaction<F>(&mut self, walk: F) -> Result<Schema, SchemaError>
    where
        F: FnOnce(&mut Self) -> Result<Schema, SchemaError>,
    {
        self.journal.clear();
        let result = walk(self);
        if let Err(error) = &result {
            tracing::debug!(%error, reserved = self.journal.len(), "walk failed, rolling back");
            for id in std::mem::take(&mut self.journal) {
                self.states.remove(&id);
                if let Some(name) = self.names.remove(&id) {
                    self.owners.remove(&name);
                    self.definitions.remove(&name);
                }
            }
        }
        self.journal.clear();
        result
    }
}

impl fmt::Debug for Schemas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Schemas")
            .field("prefix", &self.prefix)
            .field("definitions", &names)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}
