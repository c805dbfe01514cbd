//! Command values
//!
//! A command is an immutable value describing a requested action. It is
//! identified by its concrete type: producers construct one, push it through
//! the queue, and every handler bound to that type receives it.

use std::any::Any;

use axon_core::TypeKey;

/// Marker trait for command values.
///
/// Blanket-implemented for every `'static` thread-safe value; a command
/// carries whatever payload fields its variant needs and nothing else.
pub trait Command: Any + Send + Sync {
    /// The type key commands of this concrete type dispatch under.
    fn key() -> TypeKey
    where
        Self: Sized,
    {
        TypeKey::of::<Self>()
    }
}

impl<T: Any + Send + Sync> Command for T {}
