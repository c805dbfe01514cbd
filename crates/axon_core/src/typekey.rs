//! Stable type identity
//!
//! `TypeKey` stands in for reflection-based type identity: a compile-time
//! established tag that can key binding tables everywhere in the framework.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque, comparable identifier for a runtime type.
///
/// Carries the type name alongside the `TypeId` so diagnostics and error
/// messages can say which type they are talking about. Equality and hashing
/// use only the `TypeId`.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Create the key for a concrete type.
    ///
    /// `?Sized` so trait-object types (`dyn Trait`) can key bindings too.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Human-readable type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The underlying `TypeId`.
    pub fn id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
