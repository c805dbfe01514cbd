//! # axon_core - Axon Core Primitives
//!
//! Foundational abstractions shared by every Axon crate:
//! - `TypeKey`: a stable, comparable identifier for a runtime type
//! - `Binding`: the uniform key/value storage primitive used for callback
//!   tables, injection bindings, and object libraries
//!
//! Everything here is single-threaded plumbing; callers serialize access.

pub mod binding;
pub mod error;
pub mod typekey;

pub use binding::Binding;
pub use error::BindingError;
pub use typekey::TypeKey;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::binding::Binding;
    pub use crate::error::BindingError;
    pub use crate::typekey::TypeKey;
}
