//! [`Describe`] implementations for standard library and ecosystem types.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

use crate::describe::{Describe, Kind, TypeDescriptor, TypeRef};

macro_rules! describe_scalar {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::anonymous::<Self>(Kind::$kind)
                }
            }
        )+
    };
}

describe_scalar!(String => String, str, char, Cow<'static, str>);
describe_scalar!(Number => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
describe_scalar!(Boolean => bool);

impl Describe for serde_json::Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Any)
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Optional(TypeRef::of::<T>()))
    }
}

// Smart pointers are transparent: they share the pointee's identity.
macro_rules! describe_transparent {
    ($($ptr:ident),+) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ptr<T> {
                fn describe() -> TypeDescriptor {
                    T::describe()
                }

                fn qualified_name() -> String {
                    T::qualified_name()
                }
            }
        )+
    };
}

describe_transparent!(Box, Rc, Arc);

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Seq(TypeRef::of::<T>()))
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Seq(TypeRef::of::<T>()))
    }
}

impl<T: Describe> Describe for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Seq(TypeRef::of::<T>()))
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Seq(TypeRef::of::<T>()))
    }
}

impl<T: Describe, S: 'static> Describe for HashSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Seq(TypeRef::of::<T>()))
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Array {
            item: TypeRef::of::<T>(),
            len: N,
        })
    }
}

impl<K: Describe, V: Describe, S: 'static> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Map {
            key: TypeRef::of::<K>(),
            value: TypeRef::of::<V>(),
        })
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Map {
            key: TypeRef::of::<K>(),
            value: TypeRef::of::<V>(),
        })
    }
}

impl Describe for serde_json::Map<String, serde_json::Value> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Map {
            key: TypeRef::of::<String>(),
            value: TypeRef::of::<serde_json::Value>(),
        })
    }
}

// Opaque library types: no public fields, so they walk as empty objects
// unless a handler maps them.
impl Describe for chrono::DateTime<chrono::Utc> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::named::<Self>(Kind::Struct(Vec::new()))
    }
}

impl Describe for chrono::NaiveDate {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::named::<Self>(Kind::Struct(Vec::new()))
    }
}

impl Describe for num_bigint::BigInt {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::named::<Self>(Kind::Struct(Vec::new()))
    }
}

impl<R: 'static> Describe for fn() -> R {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Function)
    }
}

impl<A: 'static, R: 'static> Describe for fn(A) -> R {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Function)
    }
}

impl<T: 'static> Describe for Sender<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Channel)
    }
}

impl<T: 'static> Describe for SyncSender<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Channel)
    }
}

impl<T: 'static> Describe for Receiver<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::anonymous::<Self>(Kind::Channel)
    }
}
