//! The root application context

use std::time::Duration;

use axon_command::{Command, CommandBus, CommandQueue, HandlerId, HandlerResult};
use axon_inject::{Factory, Injector};
use axon_registry::ObjectRegistry;

use crate::config::AppConfig;

/// Root context owning one command bus, one command queue, the injection
/// bindings, and the root object registry scope.
///
/// Single-threaded by design: the caller drives [`App::tick`] once per
/// logical frame. A handler must not re-enter the app's queue processing
/// within the same tick. For hosts with producers on other threads, wrap
/// the app in [`crate::SharedApp`].
pub struct App {
    bus: CommandBus,
    queue: CommandQueue,
    injector: Injector,
    factory: Factory,
    objects: ObjectRegistry,
    config: AppConfig,
}

impl App {
    /// Create an app with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create an app with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            bus: CommandBus::new(),
            queue: CommandQueue::new(),
            injector: Injector::new(),
            factory: Factory::new(),
            objects: ObjectRegistry::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The command bus.
    pub fn bus(&self) -> &CommandBus {
        &self.bus
    }

    /// The command bus, mutably (for binding handlers).
    pub fn bus_mut(&mut self) -> &mut CommandBus {
        &mut self.bus
    }

    /// The command queue.
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// The command queue, mutably.
    pub fn queue_mut(&mut self) -> &mut CommandQueue {
        &mut self.queue
    }

    /// The injection bindings.
    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// The injection bindings, mutably.
    pub fn injector_mut(&mut self) -> &mut Injector {
        &mut self.injector
    }

    /// The construction pipeline.
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// The construction pipeline, mutably.
    pub fn factory_mut(&mut self) -> &mut Factory {
        &mut self.factory
    }

    /// The root object registry scope.
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    /// The root object registry scope, mutably.
    pub fn objects_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.objects
    }

    /// Bind a handler to a command type.
    pub fn bind_command<C, F>(&mut self, handler: F) -> HandlerId
    where
        C: Command,
        F: Fn(&C) -> HandlerResult + Send + Sync + 'static,
    {
        self.bus.bind(handler)
    }

    /// Remove a previously bound command handler.
    pub fn unbind_command(&mut self, id: HandlerId) {
        self.bus.unbind(id);
    }

    /// Push a command with no delay.
    pub fn push<C: Command>(&mut self, command: C) {
        self.queue.push(command);
    }

    /// Push a command delayed by a number of ticks.
    pub fn push_after_frames<C: Command>(&mut self, command: C, frames: u64) {
        self.queue.push_after_frames(command, frames);
    }

    /// Push a command delayed by wall time.
    pub fn push_after<C: Command>(&mut self, command: C, delay: Duration) {
        self.queue.push_after(command, delay);
    }

    /// Run the registry's one-time initialize phase. Idempotent.
    pub fn initialize(&mut self) {
        self.objects.initialize_all();
    }

    /// Run one logical tick: advance the queue clock, process queued
    /// commands, then update every registered object.
    ///
    /// `delta` is clamped to the configured `max_delta_time`.
    pub fn tick(&mut self, delta: f32) {
        let delta = delta.min(self.config.max_delta_time);
        self.queue.advance(Duration::from_secs_f32(delta));
        match self.config.max_commands_per_tick {
            Some(limit) => self.queue.process_up_to(&self.bus, limit),
            None => self.queue.process_all(&self.bus),
        }
        self.objects.update(delta);
    }

    /// Tear the context down: destroy the registry scope and discard any
    /// still-queued commands.
    pub fn shutdown(&mut self) {
        let dropped = self.queue.drain();
        if dropped > 0 {
            log::debug!("discarded {} queued commands at shutdown", dropped);
        }
        self.objects.destroy();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
