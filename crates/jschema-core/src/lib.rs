//! # jschema-core
//!
//! Schema data model and type descriptors for jschema.
//!
//! This crate provides the leaf types shared by the registry:
//! - [`Schema`] and [`Properties`]: the JSON Schema node model, serialized with serde
//! - [`Describe`], [`TypeDescriptor`], [`TypeRef`], [`Kind`]: the structural view of a type
//! - [`Field`], [`Tags`], [`JsonTag`]: struct fields and their metadata tags
//! - `Describe` impls for primitives, std collections, smart pointers, `serde_json`
//!   values and `chrono` timestamps
//!
//! ## Describing a type
//!
//! ```
//! use jschema_core::{Describe, Field, Kind, TypeDescriptor};
//!
//! struct Node {
//!     id: u64,
//!     children: Vec<Option<Box<Node>>>,
//! }
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
//! assert_eq!(Node::describe().display_name(), "Node");
//! ```

pub mod describe;
pub mod field;
mod impls;
pub mod schema;

pub use describe::{Describe, Kind, TypeDescriptor, TypeRef, short_name};
pub use field::{DEFAULT_TAG, DESCRIPTION_TAG, Field, JSON_TAG, JsonTag, Tags};
pub use schema::{Properties, Schema, SchemaType};
