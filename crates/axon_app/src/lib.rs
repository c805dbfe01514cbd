//! # axon_app - Application Context
//!
//! The root context that ties the framework together. One `App` owns:
//! - a `CommandBus` (type-to-handler multicast dispatch)
//! - a `CommandQueue` (delayed, tick-scheduled command delivery)
//! - an `Injector` and `Factory` (object construction with dependency
//!   resolution)
//! - the root `ObjectRegistry` scope (service lifecycle)
//!
//! ```text
//! producers ──► CommandQueue ──► CommandBus ──► handlers
//!                    ▲                              │
//!                    │ tick(delta)                  ▼
//!                 App ──────────────────► ObjectRegistry.update
//! ```
//!
//! There are no process-wide statics: everything reaches its bus, queue,
//! and registry through a context handed to it explicitly. The caller
//! drives `App::tick` once per logical frame from its own main loop.

pub mod app;
pub mod config;
pub mod shared;

pub use app::App;
pub use config::AppConfig;
pub use shared::SharedApp;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::App;
    pub use crate::config::AppConfig;
    pub use crate::shared::SharedApp;

    pub use axon_command::prelude::*;
    pub use axon_core::prelude::*;
    pub use axon_inject::prelude::*;
    pub use axon_registry::prelude::*;
}
