//! Shared application handle

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::app::App;

/// Thread-safe handle to an [`App`].
///
/// Clones share the same underlying app. Producers on other threads take a
/// write lock to push commands; the driving thread takes a write lock for
/// the duration of each tick. A handler running inside a tick already holds
/// the write lock, so it must not call back through a `SharedApp` handle;
/// it receives what it needs through injection instead.
#[derive(Clone)]
pub struct SharedApp {
    inner: Arc<RwLock<App>>,
}

impl SharedApp {
    /// Wrap an app in a shared handle.
    pub fn new(app: App) -> Self {
        Self {
            inner: Arc::new(RwLock::new(app)),
        }
    }

    /// Acquire a read lock on the app.
    pub fn read(&self) -> RwLockReadGuard<'_, App> {
        self.inner.read()
    }

    /// Acquire a write lock on the app.
    pub fn write(&self) -> RwLockWriteGuard<'_, App> {
        self.inner.write()
    }

    /// The underlying shared pointer.
    pub fn clone_arc(&self) -> Arc<RwLock<App>> {
        self.inner.clone()
    }
}

impl Default for SharedApp {
    fn default() -> Self {
        Self::new(App::new())
    }
}
