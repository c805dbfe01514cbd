//! Object registry
//!
//! Owns a scope's worth of service instances and drives their lifecycle in
//! registration order.

use axon_core::{Binding, TypeKey};
use thiserror::Error;

use crate::capability::{Capabilities, Managed};

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("object instance type/name combination is not unique: {type_name}/{name}")]
    DuplicateName {
        type_name: &'static str,
        name: String,
    },
}

struct Entry {
    object: Box<dyn Managed>,
    caps: Capabilities,
}

/// A per-scope container of singleton and named-transient instances.
///
/// The registry exclusively owns everything registered into it; instances
/// are destroyed when the scope is. Lifecycle hooks fire at most once per
/// object and phase, in registration order. Not thread-safe on its own;
/// see the application-level shared wrapper for multi-threaded hosts.
pub struct ObjectRegistry {
    // slots keep registration order stable; a replaced singleton leaves a
    // hole rather than shifting later entries
    entries: Vec<Option<Entry>>,
    singletons: Binding<TypeKey, usize>,
    transients: Binding<TypeKey, Binding<String, usize>>,
    initialized: bool,
}

impl ObjectRegistry {
    /// Create an empty, uninitialized registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            singletons: Binding::new(),
            transients: Binding::new(),
            initialized: false,
        }
    }

    /// Register an object as the singleton instance for its type.
    ///
    /// Last write wins: a previously registered instance is removed from
    /// the lifecycle collections and handed back to the caller. It is never
    /// auto-destroyed; run its teardown yourself if it needs one.
    pub fn register_singleton<T: Managed>(&mut self, object: T) -> Option<Box<dyn Managed>> {
        let key = TypeKey::of::<T>();
        let slot = self.insert(Box::new(object));
        let previous = self
            .singletons
            .bind(key, slot)
            .and_then(|old| self.entries[old].take());
        if previous.is_some() {
            log::warn!("replacing singleton instance for {}", key);
        }
        previous.map(|entry| entry.object)
    }

    /// Register an object under a (type, name) pair.
    ///
    /// The name must be unique per type; a duplicate is an error and the
    /// object is not registered.
    pub fn register_transient<T: Managed>(
        &mut self,
        name: impl Into<String>,
        object: T,
    ) -> Result<(), RegistryError> {
        let key = TypeKey::of::<T>();
        let name = name.into();

        let occupied = self
            .transients
            .resolve(&key)
            .map_or(false, |names| names.is_bound(name.as_str()));
        if occupied {
            return Err(RegistryError::DuplicateName {
                type_name: key.name(),
                name,
            });
        }

        let slot = self.insert(Box::new(object));
        if let Some(names) = self.transients.resolve_mut(&key) {
            names.bind(name, slot);
        } else {
            let mut names = Binding::new();
            names.bind(name, slot);
            self.transients.bind(key, names);
        }
        Ok(())
    }

    /// Resolve the singleton instance for a type.
    pub fn resolve_singleton<T: Managed>(&self) -> Option<&T> {
        let slot = *self.singletons.resolve(&TypeKey::of::<T>())?;
        self.downcast(slot)
    }

    /// Resolve the singleton instance for a type, mutably.
    pub fn resolve_singleton_mut<T: Managed>(&mut self) -> Option<&mut T> {
        let slot = *self.singletons.resolve(&TypeKey::of::<T>())?;
        self.downcast_mut(slot)
    }

    /// Resolve a named transient instance.
    ///
    /// An unknown type and an unknown name are both plain "not found";
    /// use [`contains_transient`](Self::contains_transient) to tell them
    /// apart beforehand if it matters.
    pub fn resolve_transient<T: Managed>(&self, name: &str) -> Option<&T> {
        let slot = *self.transients.resolve(&TypeKey::of::<T>())?.resolve(name)?;
        self.downcast(slot)
    }

    /// Resolve a named transient instance, mutably.
    pub fn resolve_transient_mut<T: Managed>(&mut self, name: &str) -> Option<&mut T> {
        let slot = *self.transients.resolve(&TypeKey::of::<T>())?.resolve(name)?;
        self.downcast_mut(slot)
    }

    /// Check whether a singleton is registered for a type.
    pub fn contains_singleton<T: Managed>(&self) -> bool {
        self.singletons.is_bound(&TypeKey::of::<T>())
    }

    /// Check whether a (type, name) transient is registered.
    pub fn contains_transient<T: Managed>(&self, name: &str) -> bool {
        self.transients
            .resolve(&TypeKey::of::<T>())
            .map_or(false, |names| names.is_bound(name))
    }

    /// Run the one-time initialize phase.
    ///
    /// Two full passes in registration order: every initialize hook, then
    /// every configure hook, so any object can look up fully initialized
    /// siblings from its configure. Idempotent; a second call is a no-op.
    pub fn initialize_all(&mut self) {
        if self.initialized {
            return;
        }
        log::debug!("initializing {} registered objects", self.len());

        for entry in self.entries.iter_mut().flatten() {
            if entry.caps.initialize {
                entry.object.initialize();
            }
        }
        for entry in self.entries.iter_mut().flatten() {
            if entry.caps.configure {
                entry.object.configure();
            }
        }
        self.initialized = true;
    }

    /// Whether the initialize phase has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drive every update-capable object once, in registration order.
    ///
    /// No-op until [`initialize_all`](Self::initialize_all) has completed.
    pub fn update(&mut self, delta: f32) {
        if !self.initialized {
            return;
        }
        for entry in self.entries.iter_mut().flatten() {
            if entry.caps.update {
                entry.object.update(delta);
            }
        }
    }

    /// Tear the scope down.
    ///
    /// Runs every destroy hook in registration order, then clears all
    /// collections and resets to the uninitialized state so the registry
    /// could be reused from scratch.
    pub fn destroy(&mut self) {
        log::debug!("destroying registry scope ({} objects)", self.len());
        for entry in self.entries.iter_mut().flatten() {
            if entry.caps.destroy {
                entry.object.destroy();
            }
        }
        self.entries.clear();
        self.singletons.clear();
        self.transients.clear();
        self.initialized = false;
    }

    /// Number of live registered objects.
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, mut object: Box<dyn Managed>) -> usize {
        let caps = object.capabilities();
        // fairness for late arrivals: objects registered after the scope's
        // initialize phase get their one-time hooks immediately
        if self.initialized {
            if caps.initialize {
                object.initialize();
            }
            if caps.configure {
                object.configure();
            }
        }
        let slot = self.entries.len();
        self.entries.push(Some(Entry { object, caps }));
        slot
    }

    fn downcast<T: Managed>(&self, slot: usize) -> Option<&T> {
        self.entries
            .get(slot)?
            .as_ref()?
            .object
            .as_any()
            .downcast_ref::<T>()
    }

    fn downcast_mut<T: Managed>(&mut self, slot: usize) -> Option<&mut T> {
        self.entries
            .get_mut(slot)?
            .as_mut()?
            .object
            .as_any_mut()
            .downcast_mut::<T>()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
