//! Command bus
//!
//! Binds command types to multicast handler lists and dispatches command
//! values to every handler bound to their type, in registration order.

use std::any::Any;

use axon_core::{Binding, TypeKey};
use thiserror::Error;

use crate::command::Command;

/// Error type handlers may return from a dispatch.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

type DynHandler = Box<dyn Fn(&dyn Any) -> HandlerResult + Send + Sync>;

/// Handle identifying one bound handler.
///
/// Binding the same function twice yields two distinct handles (and two
/// invocations per dispatch, multicast-style); either copy can be unbound
/// independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId {
    key: TypeKey,
    seq: u64,
}

impl HandlerId {
    /// The command type this handler was bound to.
    pub fn command_key(&self) -> TypeKey {
        self.key
    }
}

/// A handler failure captured at the dispatch boundary.
#[derive(Debug, Error)]
#[error("command {command} handler #{index} failed: {error}")]
pub struct CallbackFault {
    /// Name of the command type being dispatched.
    pub command: &'static str,
    /// Position of the failed handler in registration order.
    pub index: usize,
    /// The error the handler returned.
    pub error: HandlerError,
}

/// What happened during one dispatch.
///
/// A faulting handler never prevents the remaining handlers from running;
/// its error is logged and collected here for callers that want to inspect
/// it.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// How many handlers were invoked.
    pub invoked: usize,
    /// Faults raised by individual handlers, in invocation order.
    pub faults: Vec<CallbackFault>,
}

impl DispatchOutcome {
    /// True when every invoked handler succeeded.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Type-to-handler multicast binding table.
pub struct CommandBus {
    bindings: Binding<TypeKey, Vec<(HandlerId, DynHandler)>>,
    next_seq: u64,
}

impl CommandBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            bindings: Binding::new(),
            next_seq: 1,
        }
    }

    /// Bind a handler to a command type.
    ///
    /// Handlers run in the order they were bound. Duplicate binds are not
    /// deduplicated.
    pub fn bind<C, F>(&mut self, handler: F) -> HandlerId
    where
        C: Command,
        F: Fn(&C) -> HandlerResult + Send + Sync + 'static,
    {
        let key = TypeKey::of::<C>();
        let id = HandlerId {
            key,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        let wrapped: DynHandler = Box::new(move |any: &dyn Any| {
            if let Some(command) = any.downcast_ref::<C>() {
                handler(command)
            } else {
                Ok(())
            }
        });

        if let Some(handlers) = self.bindings.resolve_mut(&key) {
            handlers.push((id, wrapped));
        } else {
            self.bindings.bind(key, vec![(id, wrapped)]);
        }
        id
    }

    /// Remove a previously bound handler.
    ///
    /// No-op if the handle was already unbound. Handlers left bound past the
    /// lifetime of the state they capture keep that state alive, so unbind
    /// during teardown of the owning object.
    pub fn unbind(&mut self, id: HandlerId) {
        let Some(handlers) = self.bindings.resolve_mut(&id.key) else {
            return;
        };
        if let Some(pos) = handlers.iter().position(|(bound, _)| *bound == id) {
            handlers.remove(pos);
        }
        if handlers.is_empty() {
            let _ = self.bindings.unbind(&id.key);
        }
    }

    /// Dispatch a command to every handler bound to its type.
    pub fn dispatch<C: Command>(&self, command: &C) -> DispatchOutcome {
        self.dispatch_dyn(TypeKey::of::<C>(), command)
    }

    /// Dispatch an already type-erased command under an explicit key.
    ///
    /// No-op when nothing is bound to the key.
    pub fn dispatch_dyn(&self, key: TypeKey, command: &dyn Any) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let Some(handlers) = self.bindings.resolve(&key) else {
            return outcome;
        };
        for (index, (_, handler)) in handlers.iter().enumerate() {
            outcome.invoked += 1;
            if let Err(error) = handler(command) {
                log::error!("command {} handler #{} failed: {}", key, index, error);
                outcome.faults.push(CallbackFault {
                    command: key.name(),
                    index,
                    error,
                });
            }
        }
        outcome
    }

    /// Check whether any handler is bound to a command type.
    pub fn has_bindings<C: Command>(&self) -> bool {
        self.bindings.is_bound(&TypeKey::of::<C>())
    }

    /// Number of handlers bound to a command type.
    pub fn handler_count<C: Command>(&self) -> usize {
        self.bindings
            .resolve(&TypeKey::of::<C>())
            .map_or(0, Vec::len)
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct Ping(u32);

    #[test]
    fn test_dispatch_invokes_in_bind_order() {
        let mut bus = CommandBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = order.clone();
        let second = order.clone();

        bus.bind(move |cmd: &Ping| {
            first.lock().push(("first", cmd.0));
            Ok(())
        });
        bus.bind(move |cmd: &Ping| {
            second.lock().push(("second", cmd.0));
            Ok(())
        });

        let outcome = bus.dispatch(&Ping(7));
        assert_eq!(outcome.invoked, 2);
        assert!(outcome.is_clean());
        assert_eq!(*order.lock(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unbind_leaves_other_handlers() {
        let mut bus = CommandBus::new();
        let counter = Arc::new(AtomicU32::new(0));
        let keep = counter.clone();
        let drop_me = counter.clone();

        let kept = bus.bind(move |_: &Ping| {
            keep.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let removed = bus.bind(move |_: &Ping| {
            drop_me.fetch_add(10, Ordering::SeqCst);
            Ok(())
        });

        bus.unbind(removed);
        bus.dispatch(&Ping(0));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        bus.unbind(kept);
        assert!(!bus.has_bindings::<Ping>());
        let outcome = bus.dispatch(&Ping(0));
        assert_eq!(outcome.invoked, 0);
    }

    #[test]
    fn test_unbind_absent_is_noop() {
        let mut bus = CommandBus::new();
        let id = bus.bind(|_: &Ping| Ok(()));
        bus.unbind(id);
        bus.unbind(id);
        assert_eq!(bus.handler_count::<Ping>(), 0);
    }

    #[test]
    fn test_duplicate_bind_is_multicast() {
        let mut bus = CommandBus::new();
        let counter = Arc::new(AtomicU32::new(0));

        fn handler(counter: &Arc<AtomicU32>) -> impl Fn(&Ping) -> HandlerResult {
            let counter = counter.clone();
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let a = bus.bind(handler(&counter));
        let b = bus.bind(handler(&counter));
        assert_ne!(a, b);

        bus.dispatch(&Ping(0));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fault_does_not_stop_dispatch() {
        let mut bus = CommandBus::new();
        let counter = Arc::new(AtomicU32::new(0));
        let survivor = counter.clone();

        bus.bind(|_: &Ping| Err("handler exploded".into()));
        bus.bind(move |_: &Ping| {
            survivor.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let outcome = bus.dispatch(&Ping(3));
        assert_eq!(outcome.invoked, 2);
        assert_eq!(outcome.faults.len(), 1);
        assert_eq!(outcome.faults[0].index, 0);
        assert!(outcome.faults[0].command.contains("Ping"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_unbound_type_is_noop() {
        let bus = CommandBus::new();
        let outcome = bus.dispatch(&Ping(0));
        assert_eq!(outcome.invoked, 0);
        assert!(outcome.is_clean());
    }
}
