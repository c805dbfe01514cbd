//! Command queue
//!
//! FIFO queue of commands with optional frame-count or wall-time delays.
//! The queue owns a logical clock the caller advances once per tick;
//! delayed commands are cooperatively re-checked each tick, never awaited.

use std::any::Any;
use std::collections::VecDeque;
use std::time::Duration;

use axon_core::TypeKey;

use crate::bus::CommandBus;
use crate::command::Command;

/// How long a queued command waits before it becomes ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delay {
    /// Ready on the next processing pass.
    None,
    /// Ready once this many ticks have elapsed since the push.
    Frames(u64),
    /// Ready once this much queue time has elapsed since the push.
    Time(Duration),
}

/// A queued command plus its scheduling metadata.
///
/// Stamped at push time and never mutated; a not-yet-ready envelope is
/// re-queued verbatim at the tail.
pub struct CommandEnvelope {
    key: TypeKey,
    command: Box<dyn Any + Send + Sync>,
    delay: Delay,
    pushed_tick: u64,
    pushed_at: Duration,
}

impl CommandEnvelope {
    /// The command type this envelope dispatches under.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// The delay this envelope was pushed with.
    pub fn delay(&self) -> Delay {
        self.delay
    }

    fn is_ready(&self, tick: u64, elapsed: Duration) -> bool {
        match self.delay {
            Delay::None => true,
            Delay::Frames(frames) => tick - self.pushed_tick >= frames,
            Delay::Time(delay) => elapsed - self.pushed_at >= delay,
        }
    }
}

/// FIFO command queue processed incrementally once per scheduler tick.
///
/// FIFO order holds among commands of equal readiness. A not-yet-ready
/// command is re-inserted at the tail, so a later-pushed ready command may
/// dispatch before an earlier delayed one; this reordering is part of the
/// contract, not a bug.
///
/// Not reentrant: a handler must not call back into the same queue's
/// `process_*` methods within the same tick.
pub struct CommandQueue {
    queue: VecDeque<CommandEnvelope>,
    tick: u64,
    elapsed: Duration,
    deferred: usize,
}

impl CommandQueue {
    /// Create an empty queue with its clock at zero.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            tick: 0,
            elapsed: Duration::ZERO,
            deferred: 0,
        }
    }

    /// Advance the queue's logical clock by one tick of `delta` duration.
    pub fn advance(&mut self, delta: Duration) {
        self.tick += 1;
        self.elapsed += delta;
    }

    /// Current tick count.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total queue time accumulated by `advance`.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Push a command with no delay; it is ready on the next process call.
    pub fn push<C: Command>(&mut self, command: C) {
        self.enqueue(TypeKey::of::<C>(), Box::new(command), Delay::None);
    }

    /// Push a command that becomes ready after `frames` ticks.
    pub fn push_after_frames<C: Command>(&mut self, command: C, frames: u64) {
        self.enqueue(TypeKey::of::<C>(), Box::new(command), Delay::Frames(frames));
    }

    /// Push a command that becomes ready after `delay` of queue time.
    pub fn push_after<C: Command>(&mut self, command: C, delay: Duration) {
        self.enqueue(TypeKey::of::<C>(), Box::new(command), Delay::Time(delay));
    }

    fn enqueue(&mut self, key: TypeKey, command: Box<dyn Any + Send + Sync>, delay: Delay) {
        self.queue.push_back(CommandEnvelope {
            key,
            command,
            delay,
            pushed_tick: self.tick,
            pushed_at: self.elapsed,
        });
    }

    /// Pop the head of the queue and dispatch it if ready.
    ///
    /// A not-yet-ready head is counted as deferred and re-queued at the
    /// tail. Returns whether another call could still make progress this
    /// tick: once every remaining entry has been inspected once without
    /// becoming ready, this returns `false` so a `process_all` loop cannot
    /// spin forever on delayed commands.
    pub fn process_one(&mut self, bus: &CommandBus) -> bool {
        let Some(envelope) = self.queue.pop_front() else {
            self.deferred = 0;
            return false;
        };

        if !envelope.is_ready(self.tick, self.elapsed) {
            self.deferred += 1;
            self.queue.push_back(envelope);
            return self.queue.len() > self.deferred;
        }

        bus.dispatch_dyn(envelope.key, envelope.command.as_ref());
        !self.queue.is_empty()
    }

    /// Process every command that is (or becomes) dispatchable this tick.
    pub fn process_all(&mut self, bus: &CommandBus) {
        while self.process_one(bus) {}
    }

    /// Process up to `limit` commands, stopping early once no further
    /// progress is possible this tick.
    pub fn process_up_to(&mut self, bus: &CommandBus, limit: usize) {
        for _ in 0..limit {
            if !self.process_one(bus) {
                return;
            }
        }
    }

    /// Number of queued envelopes, ready or not.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every queued command without dispatching, returning how many
    /// were discarded. This is the only way to cancel a queued command.
    pub fn drain(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        self.deferred = 0;
        dropped
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
