//! # axon_inject - Dependency Injection
//!
//! Maps requested types to implementations and constructs object graphs:
//! - `Injector`: type-keyed bindings to a shared singleton instance or a
//!   transient constructor producing a fresh implementation per resolve
//! - `Injectable`: how an object declares and fills its injection targets
//! - `Factory`: default-construct + inject + post-construction finalizer
//!   pipeline, with one-step registration into an `ObjectRegistry`
//!
//! ```ignore
//! let mut injector = Injector::new();
//! injector.bind_singleton::<dyn Clock>(Arc::new(SystemClock::new()));
//! injector.bind_transient::<AudioMixer>();
//!
//! let factory = Factory::new();
//! let player: Player = factory.create(&injector)?;
//! ```

pub mod factory;
pub mod injector;

pub use factory::{Factory, FactoryError};
pub use injector::{InjectError, Injectable, InjectionContext, Injector};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::factory::{Factory, FactoryError};
    pub use crate::injector::{InjectError, Injectable, InjectionContext, Injector};
}
