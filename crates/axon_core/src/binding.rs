//! Generic binding table
//!
//! `Binding` is the uniform storage primitive of the framework: callback
//! tables, injection bindings, and object libraries are all bindings from
//! some key to some value.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::BindingError;

/// A key/value mapping with overwrite-on-rebind semantics.
///
/// Keys are unique; rebinding a key replaces its value. Reads of absent keys
/// return `None` rather than failing. Iteration order is unspecified.
pub struct Binding<K, V> {
    entries: HashMap<K, V>,
}

impl<K: Eq + Hash, V> Binding<K, V> {
    /// Create an empty binding table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Bind a value to a key, returning the previously bound value if the
    /// key was already occupied.
    pub fn bind(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Resolve a key to its bound value.
    pub fn resolve<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key)
    }

    /// Resolve a key to a mutable reference to its bound value.
    pub fn resolve_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get_mut(key)
    }

    /// Check whether a key is bound.
    pub fn is_bound<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Remove a binding and return its value. Unbinding an absent key is an
    /// error, unlike a read-miss.
    pub fn unbind(&mut self, key: &K) -> Result<V, BindingError>
    where
        K: fmt::Debug,
    {
        self.entries
            .remove(key)
            .ok_or_else(|| BindingError::NotBound(format!("{:?}", key)))
    }

    /// Collect every key whose value compares equal to `value`.
    ///
    /// Linear scan over the whole table; intended for diagnostics only,
    /// never for hot-path lookup.
    pub fn find_keys_by_value(&self, value: &V) -> Vec<&K>
    where
        V: PartialEq,
    {
        self.entries
            .iter()
            .filter(|(_, v)| *v == value)
            .map(|(k, _)| k)
            .collect()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Number of bindings in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Eq + Hash, V> Default for Binding<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + fmt::Debug, V> fmt::Debug for Binding<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("entries", &self.entries.len())
            .finish()
    }
}
