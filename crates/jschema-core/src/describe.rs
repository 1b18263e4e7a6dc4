//! Type descriptors: the structural view of a Rust type that the registry walks.
//!
//! A type opts in by implementing [`Describe`]. Descriptors decompose a type
//! exactly one level: children are [`TypeRef`] handles that are only
//! described when the walker reaches them, so recursive types stay finite.

use std::any::TypeId;
use std::fmt;

use serde_json::Value;

use crate::field::Field;

/// Structural description of a type.
pub trait Describe: 'static {
    /// Decompose this type one level.
    fn describe() -> TypeDescriptor;

    /// Fully qualified name, used as the default definition description.
    fn qualified_name() -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Lazy, copyable handle to a described type.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    describe: fn() -> TypeDescriptor,
    type_name: fn() -> &'static str,
}

impl TypeRef {
    #[must_use]
    pub fn of<T: Describe + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            describe: T::describe,
            type_name: std::any::type_name::<T>,
        }
    }

    /// Identity of the handle's own type. Transparent wrappers such as
    /// `Box<T>` report `T`'s identity from [`TypeRef::describe`] instead.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn describe(&self) -> TypeDescriptor {
        (self.describe)()
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.type_name()).finish()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

/// Structural kind of a described type.
#[derive(Debug, Clone)]
pub enum Kind {
    String,
    Number,
    Boolean,
    /// Dynamic value with no static shape.
    Any,
    /// Fields in declaration order.
    Struct(Vec<Field>),
    /// Dynamic-length sequence.
    Seq(TypeRef),
    /// Fixed-length array.
    Array { item: TypeRef, len: usize },
    Map { key: TypeRef, value: TypeRef },
    /// Value that may be absent.
    Optional(TypeRef),
    Function,
    Channel,
}

impl Kind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Any => "any",
            Self::Struct(_) => "struct",
            Self::Seq(_) => "sequence",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Optional(_) => "optional",
            Self::Function => "function",
            Self::Channel => "channel",
        }
    }

    /// Whether a map keyed by this kind can be expressed as a JSON object.
    #[must_use]
    pub const fn is_string_like(&self) -> bool {
        matches!(self, Self::String)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-level description of a type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub id: TypeId,
    /// Short display name for named types, `None` for anonymous shapes.
    pub name: Option<String>,
    pub qualified_name: String,
    pub kind: Kind,
    /// Literal value set of an enum-like scalar.
    pub enum_values: Vec<Value>,
}

impl TypeDescriptor {
    /// A named type: it gets its own definition in the registry.
    #[must_use]
    pub fn named<T: Describe + ?Sized>(kind: Kind) -> Self {
        let qualified_name = T::qualified_name();
        Self {
            id: TypeId::of::<T>(),
            name: Some(short_name(&qualified_name).to_string()),
            qualified_name,
            kind,
            enum_values: Vec::new(),
        }
    }

    /// An anonymous shape: always inlined where it is used.
    #[must_use]
    pub fn anonymous<T: Describe + ?Sized>(kind: Kind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: None,
            qualified_name: T::qualified_name(),
            kind,
            enum_values: Vec::new(),
        }
    }

    /// Override the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare the literal values this type may take.
    #[must_use]
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Display name, falling back to the short form of the qualified name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| short_name(&self.qualified_name))
    }
}

/// Last path segment of a type name, without generic arguments.
///
/// `chrono::DateTime<chrono::Utc>` becomes `DateTime`; a dotted name such as
/// `math/big.Int` becomes `Int`.
#[must_use]
pub fn short_name(qualified: &str) -> &str {
    let base = qualified.split('<').next().unwrap_or(qualified);
    let segment = base.rsplit("::").next().unwrap_or(base);
    segment.rsplit('.').next().unwrap_or(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Plain;

    impl Describe for Plain {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::named::<Self>(Kind::Struct(Vec::new()))
        }
    }

    struct Renamed;

    impl Describe for Renamed {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::named::<Self>(Kind::String).with_name("Label")
        }

        fn qualified_name() -> String {
            "labels.Renamed".to_string()
        }
    }

    #[rstest]
    #[case("Node", "Node")]
    #[case("app::model::Node", "Node")]
    #[case("chrono::DateTime<chrono::offset::utc::Utc>", "DateTime")]
    #[case("alloc::vec::Vec<app::Node>", "Vec")]
    #[case("labels.Renamed", "Renamed")]
    #[case("math/big.Int", "Int")]
    fn short_name_strips_path_and_generics(#[case] qualified: &str, #[case] expected: &str) {
        assert_eq!(short_name(qualified), expected);
    }

    #[test]
    fn named_descriptor_uses_short_name() {
        let desc = Plain::describe();
        assert_eq!(desc.name.as_deref(), Some("Plain"));
        assert!(desc.qualified_name.ends_with("::Plain"));
        assert_eq!(desc.id, TypeId::of::<Plain>());
    }

    struct Dotted;

    impl Describe for Dotted {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::named::<Self>(Kind::String)
        }

        fn qualified_name() -> String {
            "labels.Dotted".to_string()
        }
    }

    #[test]
    fn dotted_qualified_name_yields_last_segment() {
        let desc = Dotted::describe();
        assert_eq!(desc.display_name(), "Dotted");
        assert_eq!(desc.qualified_name, "labels.Dotted");
    }

    #[test]
    fn qualified_name_can_be_injected() {
        let desc = Renamed::describe();
        assert_eq!(desc.display_name(), "Label");
        assert_eq!(desc.qualified_name, "labels.Renamed");
    }

    #[test]
    fn type_ref_is_lazy_and_comparable() {
        let a = TypeRef::of::<Plain>();
        let b = TypeRef::of::<Plain>();
        assert_eq!(a, b);
        assert_ne!(a, TypeRef::of::<Renamed>());
        assert!(matches!(a.describe().kind, Kind::Struct(_)));
    }

    #[test]
    fn enum_values_are_collected() {
        let desc = TypeDescriptor::named::<Plain>(Kind::String).with_enum(["one", "two"]);
        assert_eq!(desc.enum_values, vec![Value::from("one"), Value::from("two")]);
    }
}
