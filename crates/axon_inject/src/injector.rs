//! Injection bindings and resolution
//!
//! The injector maps a requested type to either a shared singleton instance
//! or a transient constructor that builds a fresh, fully injected
//! implementation per resolve. Objects pull their own declared dependencies
//! from an `InjectionContext`, which carries the resolution stack used for
//! cycle detection.

use std::any::Any;
use std::sync::Arc;

use axon_core::{Binding, TypeKey};
use thiserror::Error;

/// Injection errors
#[derive(Debug, Error)]
pub enum InjectError {
    /// A type transitively resolved into itself.
    #[error("injection cycle detected: {chain}")]
    Cycle { chain: String },

    /// A required dependency had no binding.
    #[error("no injection binding for required type: {0}")]
    Unbound(&'static str),
}

type TransientCtor =
    Box<dyn Fn(&mut InjectionContext) -> Result<Box<dyn Any + Send + Sync>, InjectError> + Send + Sync>;

enum Provider {
    /// A fixed shared instance, handed out as-is.
    Singleton(Box<dyn Any + Send + Sync>),
    /// Constructs a fresh implementation on every resolve.
    Transient(TransientCtor),
}

/// Trait for objects that receive injected dependencies.
///
/// The object resolves and assigns its own declared dependencies; the
/// default implementation declares none. Transient construction re-enters
/// injection, so a dependency graph is walked depth-first through the
/// bindings.
pub trait Injectable {
    /// Fill this object's injection targets from the context.
    fn inject(&mut self, _ctx: &mut InjectionContext) -> Result<(), InjectError> {
        Ok(())
    }
}

/// Type-keyed injection bindings.
pub struct Injector {
    providers: Binding<TypeKey, Provider>,
}

impl Injector {
    /// Create an injector with no bindings.
    pub fn new() -> Self {
        Self {
            providers: Binding::new(),
        }
    }

    /// Bind a type to a fixed shared instance.
    ///
    /// Resolution hands out clones of this `Arc`, so every consumer sees
    /// the identical instance. `T` may be a trait object
    /// (`bind_singleton::<dyn Service>(...)`).
    pub fn bind_singleton<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        let key = TypeKey::of::<T>();
        if self
            .providers
            .bind(key, Provider::Singleton(Box::new(instance)))
            .is_some()
        {
            log::debug!("rebinding injection provider for {}", key);
        }
    }

    /// Bind a concrete type to itself as a transient: every resolve
    /// default-constructs and injects a fresh instance.
    pub fn bind_transient<I>(&mut self)
    where
        I: Injectable + Default + Send + Sync + 'static,
    {
        self.bind_transient_with::<I, _>(|ctx| Ok(Arc::new(ctx.construct::<I>()?)));
    }

    /// Bind a type to a transient constructor closure.
    ///
    /// This is the interface-keyed form: the closure builds whatever
    /// implementation it likes (typically via
    /// [`InjectionContext::construct`]) and returns it under the requested
    /// type.
    pub fn bind_transient_with<T, F>(&mut self, make: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&mut InjectionContext) -> Result<Arc<T>, InjectError> + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        let ctor: TransientCtor =
            Box::new(move |ctx| make(ctx).map(|arc| Box::new(arc) as Box<dyn Any + Send + Sync>));
        if self.providers.bind(key, Provider::Transient(ctor)).is_some() {
            log::debug!("rebinding injection provider for {}", key);
        }
    }

    /// Check whether a type has an injection binding.
    pub fn is_bound<T: ?Sized + 'static>(&self) -> bool {
        self.providers.is_bound(&TypeKey::of::<T>())
    }

    /// Resolve a type from a fresh context.
    ///
    /// `Ok(None)` for an unbound type: absence is not an error at this
    /// layer, callers decide whether a missing dependency is fatal.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>, InjectError> {
        InjectionContext::new(self).resolve::<T>()
    }

    /// Run injection over an existing object's targets.
    pub fn inject_into<T: Injectable>(&self, target: &mut T) -> Result<(), InjectError> {
        let mut ctx = InjectionContext::new(self);
        target.inject(&mut ctx)
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

/// One resolution walk through the binding graph.
///
/// Tracks the stack of types currently being resolved so a cycle in the
/// bindings is reported instead of recursing forever.
pub struct InjectionContext<'a> {
    injector: &'a Injector,
    stack: Vec<TypeKey>,
}

impl<'a> InjectionContext<'a> {
    /// Start a fresh resolution walk.
    pub fn new(injector: &'a Injector) -> Self {
        Self {
            injector,
            stack: Vec::new(),
        }
    }

    /// Resolve a dependency, or `Ok(None)` when unbound.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(
        &mut self,
    ) -> Result<Option<Arc<T>>, InjectError> {
        let key = TypeKey::of::<T>();
        let injector: &'a Injector = self.injector;
        match injector.providers.resolve(&key) {
            None => Ok(None),
            Some(Provider::Singleton(instance)) => {
                Ok(instance.downcast_ref::<Arc<T>>().cloned())
            }
            Some(Provider::Transient(make)) => {
                if self.stack.contains(&key) {
                    return Err(self.cycle_error(key));
                }
                self.stack.push(key);
                let produced = make(self);
                self.stack.pop();
                Ok(produced?.downcast::<Arc<T>>().ok().map(|arc| *arc))
            }
        }
    }

    /// Resolve a dependency the caller cannot function without.
    pub fn resolve_required<T: ?Sized + Send + Sync + 'static>(
        &mut self,
    ) -> Result<Arc<T>, InjectError> {
        self.resolve::<T>()?
            .ok_or_else(|| InjectError::Unbound(TypeKey::of::<T>().name()))
    }

    /// Default-construct an implementation and run its injection targets
    /// within this walk.
    pub fn construct<I: Injectable + Default>(&mut self) -> Result<I, InjectError> {
        let mut object = I::default();
        object.inject(self)?;
        Ok(object)
    }

    fn cycle_error(&self, key: TypeKey) -> InjectError {
        let mut chain: Vec<&str> = self.stack.iter().map(TypeKey::name).collect();
        chain.push(key.name());
        InjectError::Cycle {
            chain: chain.join(" -> "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            self.0
        }
    }

    #[derive(Debug, Default)]
    struct Mixer {
        channels: u32,
    }

    impl Injectable for Mixer {}

    #[derive(Default)]
    struct Engine {
        clock: Option<Arc<dyn Clock>>,
        mixer: Option<Arc<Mixer>>,
    }

    impl Injectable for Engine {
        fn inject(&mut self, ctx: &mut InjectionContext) -> Result<(), InjectError> {
            self.clock = ctx.resolve()?;
            self.mixer = ctx.resolve()?;
            Ok(())
        }
    }

    #[test]
    fn test_singleton_resolution_preserves_identity() {
        let mut injector = Injector::new();
        let config = Arc::new(Mixer { channels: 8 });
        injector.bind_singleton(config.clone());

        let first = injector.resolve::<Mixer>().unwrap().unwrap();
        let second = injector.resolve::<Mixer>().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &config));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.channels, 8);
    }

    #[test]
    fn test_trait_object_singleton() {
        let mut injector = Injector::new();
        injector.bind_singleton::<dyn Clock>(Arc::new(FixedClock(42)));

        let clock = injector.resolve::<dyn Clock>().unwrap().unwrap();
        assert_eq!(clock.now(), 42);
    }

    #[test]
    fn test_transient_constructs_fresh_instances() {
        let mut injector = Injector::new();
        injector.bind_transient::<Mixer>();

        let a = injector.resolve::<Mixer>().unwrap().unwrap();
        let b = injector.resolve::<Mixer>().unwrap().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_nested_injection_through_transient() {
        let mut injector = Injector::new();
        injector.bind_singleton::<dyn Clock>(Arc::new(FixedClock(7)));
        injector.bind_transient::<Mixer>();
        injector.bind_transient::<Engine>();

        let engine = injector.resolve::<Engine>().unwrap().unwrap();
        assert_eq!(engine.clock.as_ref().unwrap().now(), 7);
        assert!(engine.mixer.is_some());
    }

    #[test]
    fn test_unbound_resolves_to_none() {
        let injector = Injector::new();
        assert!(injector.resolve::<Mixer>().unwrap().is_none());
        assert!(!injector.is_bound::<Mixer>());

        let mut ctx = InjectionContext::new(&injector);
        let err = ctx.resolve_required::<Mixer>().unwrap_err();
        assert!(matches!(err, InjectError::Unbound(name) if name.contains("Mixer")));
    }

    #[derive(Debug, Default)]
    struct Alpha {
        beta: Option<Arc<Beta>>,
    }

    #[derive(Debug, Default)]
    struct Beta {
        alpha: Option<Arc<Alpha>>,
    }

    impl Injectable for Alpha {
        fn inject(&mut self, ctx: &mut InjectionContext) -> Result<(), InjectError> {
            self.beta = ctx.resolve()?;
            Ok(())
        }
    }

    impl Injectable for Beta {
        fn inject(&mut self, ctx: &mut InjectionContext) -> Result<(), InjectError> {
            self.alpha = ctx.resolve()?;
            Ok(())
        }
    }

    #[test]
    fn test_cycle_is_detected_and_reported() {
        let mut injector = Injector::new();
        injector.bind_transient::<Alpha>();
        injector.bind_transient::<Beta>();

        let err = injector.resolve::<Alpha>().unwrap_err();
        match err {
            InjectError::Cycle { chain } => {
                assert!(chain.contains("Alpha"));
                assert!(chain.contains("Beta"));
                assert_eq!(chain.matches("Alpha").count(), 2);
            }
            other => panic!("expected cycle error, got {other}"),
        }
    }

    #[test]
    fn test_inject_into_existing_object() {
        let mut injector = Injector::new();
        injector.bind_singleton::<dyn Clock>(Arc::new(FixedClock(3)));

        let mut engine = Engine::default();
        injector.inject_into(&mut engine).unwrap();
        assert_eq!(engine.clock.as_ref().unwrap().now(), 3);
        assert!(engine.mixer.is_none());
    }
}
