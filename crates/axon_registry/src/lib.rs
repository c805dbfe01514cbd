//! # axon_registry - Scoped Object Registry
//!
//! A per-scope container of singleton and named-transient service instances.
//! The registry owns everything registered into it and drives each object's
//! lifecycle hooks according to the capabilities the object declares:
//!
//! - `initialize` - one-time setup, runs before any update
//! - `configure` - post-initialize pass, runs after every object's
//!   initialize so siblings can be looked up safely
//! - `update` - once per scheduler tick
//! - `destroy` - teardown when the scope ends
//!
//! Objects registered after the scope's initialize phase get their
//! initialize and configure hooks immediately rather than waiting for a
//! second global phase.

pub mod capability;
pub mod registry;

pub use capability::{Capabilities, Managed};
pub use registry::{ObjectRegistry, RegistryError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::capability::{Capabilities, Managed};
    pub use crate::registry::{ObjectRegistry, RegistryError};
}
