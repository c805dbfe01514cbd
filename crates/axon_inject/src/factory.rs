//! Object construction pipeline
//!
//! The factory allocates a default instance, performs injections, then
//! applies the post-construction finalizer registered for the type (if
//! any). Convenience methods register the finished object straight into an
//! `ObjectRegistry`.

use std::any::Any;

use axon_core::{Binding, TypeKey};
use axon_registry::{Managed, ObjectRegistry, RegistryError};
use thiserror::Error;

use crate::injector::{InjectError, Injectable, InjectionContext, Injector};

/// Factory errors
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("injection failed: {0}")]
    Inject(#[from] InjectError),

    #[error("registration failed: {0}")]
    Registry(#[from] RegistryError),
}

type BoxedFinalizer<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// Construction pipeline with per-type post-construction hooks.
pub struct Factory {
    // each value is a BoxedFinalizer<T> for the keyed T
    finalizers: Binding<TypeKey, Box<dyn Any + Send + Sync>>,
}

impl Factory {
    /// Create a factory with no finalizers.
    pub fn new() -> Self {
        Self {
            finalizers: Binding::new(),
        }
    }

    /// Register the post-construction hook for a type.
    ///
    /// At most one finalizer is retained per type; registering again
    /// replaces the previous one. This is a single hook, not a multicast.
    pub fn set_finalizer<T: 'static>(
        &mut self,
        finalizer: impl Fn(T) -> T + Send + Sync + 'static,
    ) {
        let boxed: BoxedFinalizer<T> = Box::new(finalizer);
        if self
            .finalizers
            .bind(TypeKey::of::<T>(), Box::new(boxed))
            .is_some()
        {
            log::debug!("replacing finalizer for {}", TypeKey::of::<T>());
        }
    }

    /// Check whether a finalizer is registered for a type.
    pub fn has_finalizer<T: 'static>(&self) -> bool {
        self.finalizers.is_bound(&TypeKey::of::<T>())
    }

    /// Create an object: default-construct, inject, then run the registered
    /// finalizer for its type.
    pub fn create<T>(&self, injector: &Injector) -> Result<T, InjectError>
    where
        T: Injectable + Default + 'static,
    {
        let mut ctx = InjectionContext::new(injector);
        let object = ctx.construct::<T>()?;
        Ok(self.finalize(object))
    }

    /// Create an object with an explicit one-off hook instead of the
    /// registered finalizer.
    pub fn create_with<T, F>(&self, injector: &Injector, hook: F) -> Result<T, InjectError>
    where
        T: Injectable + Default + 'static,
        F: FnOnce(T) -> T,
    {
        let mut ctx = InjectionContext::new(injector);
        let object = ctx.construct::<T>()?;
        Ok(hook(object))
    }

    /// Create an object and register it as the singleton for its type.
    ///
    /// Returns the replaced instance, if any, exactly like
    /// [`ObjectRegistry::register_singleton`].
    pub fn create_singleton<T>(
        &self,
        injector: &Injector,
        registry: &mut ObjectRegistry,
    ) -> Result<Option<Box<dyn Managed>>, FactoryError>
    where
        T: Injectable + Default + Managed,
    {
        let object = self.create::<T>(injector)?;
        Ok(registry.register_singleton(object))
    }

    /// Create an object and register it as a named transient.
    pub fn create_transient<T>(
        &self,
        injector: &Injector,
        registry: &mut ObjectRegistry,
        name: impl Into<String>,
    ) -> Result<(), FactoryError>
    where
        T: Injectable + Default + Managed,
    {
        let object = self.create::<T>(injector)?;
        registry.register_transient(name, object)?;
        Ok(())
    }

    fn finalize<T: 'static>(&self, object: T) -> T {
        let finalizer = self
            .finalizers
            .resolve(&TypeKey::of::<T>())
            .and_then(|any| any.downcast_ref::<BoxedFinalizer<T>>());
        match finalizer {
            Some(run) => run(object),
            None => object,
        }
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any as StdAny;
    use std::sync::Arc;

    #[derive(Default)]
    struct Turret {
        range: u32,
        clock_speed: Option<u64>,
    }

    impl Injectable for Turret {
        fn inject(&mut self, ctx: &mut InjectionContext) -> Result<(), InjectError> {
            self.clock_speed = ctx.resolve::<u64>()?.map(|v| *v);
            Ok(())
        }
    }

    impl Managed for Turret {
        fn as_any(&self) -> &dyn StdAny {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn StdAny {
            self
        }
    }

    #[test]
    fn test_create_runs_injection_and_finalizer() {
        let mut injector = Injector::new();
        injector.bind_singleton(Arc::new(120u64));

        let mut factory = Factory::new();
        factory.set_finalizer(|mut turret: Turret| {
            turret.range = 50;
            turret
        });

        let turret: Turret = factory.create(&injector).unwrap();
        assert_eq!(turret.range, 50);
        assert_eq!(turret.clock_speed, Some(120));
    }

    #[test]
    fn test_last_finalizer_wins() {
        let injector = Injector::new();
        let mut factory = Factory::new();
        factory.set_finalizer(|mut t: Turret| {
            t.range = 1;
            t
        });
        factory.set_finalizer(|mut t: Turret| {
            t.range = 2;
            t
        });

        let turret: Turret = factory.create(&injector).unwrap();
        assert_eq!(turret.range, 2);
    }

    #[test]
    fn test_explicit_hook_bypasses_registered_finalizer() {
        let injector = Injector::new();
        let mut factory = Factory::new();
        factory.set_finalizer(|mut t: Turret| {
            t.range = 1;
            t
        });

        let turret: Turret = factory
            .create_with(&injector, |mut t: Turret| {
                t.range = 99;
                t
            })
            .unwrap();
        assert_eq!(turret.range, 99);
    }

    #[test]
    fn test_create_without_finalizer_is_plain() {
        let injector = Injector::new();
        let factory = Factory::new();
        assert!(!factory.has_finalizer::<Turret>());

        let turret: Turret = factory.create(&injector).unwrap();
        assert_eq!(turret.range, 0);
        assert_eq!(turret.clock_speed, None);
    }

    #[test]
    fn test_create_singleton_registers() {
        let injector = Injector::new();
        let factory = Factory::new();
        let mut registry = ObjectRegistry::new();

        let previous = factory
            .create_singleton::<Turret>(&injector, &mut registry)
            .unwrap();
        assert!(previous.is_none());
        assert!(registry.contains_singleton::<Turret>());

        let previous = factory
            .create_singleton::<Turret>(&injector, &mut registry)
            .unwrap();
        assert!(previous.is_some());
    }

    #[test]
    fn test_create_transient_duplicate_name_fails() {
        let injector = Injector::new();
        let factory = Factory::new();
        let mut registry = ObjectRegistry::new();

        factory
            .create_transient::<Turret>(&injector, &mut registry, "east")
            .unwrap();
        factory
            .create_transient::<Turret>(&injector, &mut registry, "west")
            .unwrap();

        let result = factory.create_transient::<Turret>(&injector, &mut registry, "east");
        assert!(matches!(result, Err(FactoryError::Registry(_))));
        assert!(registry.resolve_transient::<Turret>("west").is_some());
    }
}
