//! # axon_command - Command Dispatch
//!
//! Publish/bind command dispatch for the Axon framework:
//! - Typed command values identified by their concrete type
//! - A multicast command bus with add/remove-by-handle callbacks
//! - A FIFO command queue with frame-count and wall-time delays, processed
//!   incrementally once per scheduler tick
//!
//! Producers push commands into the queue; each tick the queue dequeues the
//! ready ones and hands them to the bus, which invokes every bound handler
//! in registration order.

pub mod bus;
pub mod command;
pub mod queue;

pub use bus::{CallbackFault, CommandBus, DispatchOutcome, HandlerId, HandlerResult};
pub use command::Command;
pub use queue::{CommandEnvelope, CommandQueue, Delay};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bus::{CommandBus, DispatchOutcome, HandlerId, HandlerResult};
    pub use crate::command::Command;
    pub use crate::queue::{CommandQueue, Delay};
}
