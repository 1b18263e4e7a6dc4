//! # jschema
//!
//! JSON Schema registry generated from described Rust types.
//!
//! This crate provides:
//! - [`Schemas`]: the registry that walks [`Describe`] types into named
//!   definitions cross-referenced by `$ref`
//! - Handlers that replace structural walking for opaque types (timestamps, big integers, raw JSON)
//! - Builders for unions, constants and enums used to post-process definitions
//!
//! ## Architecture
//!
//! Types describe their shape through `jschema-core`. This crate walks those
//! descriptors, breaks cycles, resolves display name collisions and owns the
//! resulting definitions. Serialization is plain `serde_json`.
//!
//! ```
//! use jschema::{Describe, Field, Kind, Schemas, TypeDescriptor};
//!
//! struct Node;
//!
//! impl Describe for Node {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::named::<Self>(Kind::Struct(vec![
//!             Field::new::<u64>("ID").json("id").default_value("1"),
//!             Field::new::<Vec<Option<Box<Node>>>>("Children").json("children"),
//!         ]))
//!     }
//! }
//!
//! let mut schemas = Schemas::new("#/components/schemas");
//! let reference = schemas.define::<Node>().unwrap();
//! assert_eq!(reference.ref_path.as_deref(), Some("#/components/schemas/Node"));
//! println!("{}", schemas.to_json_string().unwrap());
//! ```

mod builders;
pub mod error;
mod handlers;
mod registry;
mod walk;

pub use builders::{constant, enumeration, to_values};
pub use error::SchemaError;
pub use registry::Schemas;

pub use jschema_config::{ConfigError, HandlerConfig, SchemasConfig};
pub use jschema_core::{
    DEFAULT_TAG, DESCRIPTION_TAG, Describe, Field, JSON_TAG, JsonTag, Kind, Properties, Schema,
    SchemaType, Tags, TypeDescriptor, TypeRef,
};
