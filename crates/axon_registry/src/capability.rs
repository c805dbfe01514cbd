//! Lifecycle capabilities
//!
//! An object declares which lifecycle hooks it supports through an explicit
//! capability descriptor inspected once at registration time. The finite
//! capability set replaces runtime interface reflection.

use std::any::Any;

/// The set of optional lifecycle hooks an object supports.
///
/// Declaring a capability without overriding the matching hook gives a
/// no-op; overriding a hook without declaring the capability means the
/// registry never calls it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Per-tick `update` callback.
    pub update: bool,
    /// One-time `initialize` callback.
    pub initialize: bool,
    /// Post-initialize `configure` callback.
    pub configure: bool,
    /// Teardown `destroy` callback.
    pub destroy: bool,
}

impl Capabilities {
    /// No lifecycle hooks.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every lifecycle hook.
    pub fn all() -> Self {
        Self {
            update: true,
            initialize: true,
            configure: true,
            destroy: true,
        }
    }

    /// Enable the update hook.
    pub fn with_update(mut self) -> Self {
        self.update = true;
        self
    }

    /// Enable the initialize hook.
    pub fn with_initialize(mut self) -> Self {
        self.initialize = true;
        self
    }

    /// Enable the configure hook.
    pub fn with_configure(mut self) -> Self {
        self.configure = true;
        self
    }

    /// Enable the destroy hook.
    pub fn with_destroy(mut self) -> Self {
        self.destroy = true;
        self
    }
}

/// Base trait for objects owned and driven by an `ObjectRegistry`.
///
/// All hooks default to no-ops; an implementation overrides the ones its
/// declared capabilities cover.
pub trait Managed: Any + Send + Sync {
    /// Which lifecycle hooks the registry should drive for this object.
    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
    }

    /// One-time setup. Runs exactly once, before any update.
    fn initialize(&mut self) {}

    /// Post-initialize pass. Runs after every registered object's
    /// initialize has completed.
    fn configure(&mut self) {}

    /// Per-tick callback.
    fn update(&mut self, _delta: f32) {}

    /// Teardown. Runs exactly once, when the scope is destroyed.
    fn destroy(&mut self) {}

    /// Type erasure for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable type erasure for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
