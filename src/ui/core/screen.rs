//! The shared screen and its lock.
//!
//! Everything that touches a surface goes through [`Screen`]. The mutex is the
//! only lock in the toolkit: the desktop takes it around each backend call,
//! and any other thread that wants to draw (a clock, a status updater) takes
//! it too. Widget callbacks never run while it is held.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ui::backend::Backend;

pub type SharedBackend = Box<dyn Backend + Send>;

#[derive(Clone)]
pub struct Screen {
    inner: Arc<Mutex<SharedBackend>>,
}

impl Screen {
    pub fn new<B: Backend + Send>(backend: B) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: SharedBackend) -> Self {
        Self {
            inner: Arc::new(Mutex::new(backend)),
        }
    }

    /// Acquire the screen lock. A poisoned lock is recovered: a panic in
    /// another drawing thread must not take the terminal down with it.
    pub fn lock(&self) -> MutexGuard<'_, SharedBackend> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("screen lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Run `f` with the backend while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn Backend) -> R) -> R {
        let mut guard = self.lock();
        f(&mut **guard)
    }

    /// Run `f` against the concrete backend type, if it matches.
    pub fn inspect<B: Backend, R>(&self, f: impl FnOnce(&B) -> R) -> Option<R> {
        let guard = self.lock();
        let backend: &dyn Backend = &**guard;
        let any: &dyn Any = backend;
        any.downcast_ref::<B>().map(f)
    }

    pub fn inspect_mut<B: Backend, R>(&self, f: impl FnOnce(&mut B) -> R) -> Option<R> {
        let mut guard = self.lock();
        let backend: &mut dyn Backend = &mut **guard;
        let any: &mut dyn Any = backend;
        any.downcast_mut::<B>().map(f)
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen").finish_non_exhaustive()
    }
}

/// Lets another thread ask the event loop for a repaint without touching the
/// tree.
#[derive(Clone, Debug, Default)]
pub struct RefreshSignal {
    flag: Arc<AtomicBool>,
}

impl RefreshSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/screen.rs"]
mod tests;
