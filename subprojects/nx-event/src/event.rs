//! Writable and readable event halves.
use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use crate::handle::EventHandle;

/// How a signalled event returns to the clear state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetMode {
    /// A successful wait clears the event.
    #[default]
    Auto,
    /// The event stays signalled until [`SystemEvent::clear`] is called.
    Manual,
}

/// The writable half of an event.
///
/// Dropping the `SystemEvent` does not invalidate readable handles already
/// given out; they simply never observe another signal.
pub struct SystemEvent {
    inner: Arc<Shared>,
}

impl SystemEvent {
    /// Creates a clear, auto-reset event.
    pub fn new() -> Self {
        Self::with_reset_mode(ResetMode::Auto)
    }

    /// Creates a clear event with the given reset mode.
    pub fn with_reset_mode(mode: ResetMode) -> Self {
        let inner = Arc::new(Shared {
            handle: EventHandle::next(),
            mode,
            signalled: Mutex::new(false),
            cvar: Condvar::new(),
        });
        tracing::trace!(handle = %inner.handle, ?mode, "event created");
        Self { inner }
    }

    /// Marks the event as signalled and wakes every waiter.
    pub fn signal(&self) {
        let mut signalled = self.inner.lock();
        *signalled = true;
        self.inner.cvar.notify_all();
        tracing::trace!(handle = %self.inner.handle, "event signalled");
    }

    /// Resets the event to the clear state.
    pub fn clear(&self) {
        *self.inner.lock() = false;
        tracing::trace!(handle = %self.inner.handle, "event cleared");
    }

    /// Returns `true` if the event is currently signalled.
    pub fn is_signalled(&self) -> bool {
        *self.inner.lock()
    }

    /// Returns the handle value clients see for this event.
    pub fn handle(&self) -> EventHandle {
        self.inner.handle
    }

    /// Returns a readable half that can be handed to a client.
    pub fn readable(&self) -> ReadableEvent {
        ReadableEvent {
            inner: self.inner.clone(),
        }
    }
}

impl Default for SystemEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SystemEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SystemEvent")
            .field("handle", &self.inner.handle)
            .field("mode", &self.inner.mode)
            .finish()
    }
}

/// The readable half of an event.
///
/// Cloning duplicates the handle; every clone observes the same state.
#[derive(Clone)]
pub struct ReadableEvent {
    inner: Arc<Shared>,
}

impl ReadableEvent {
    /// Returns the handle value of the underlying event.
    pub fn handle(&self) -> EventHandle {
        self.inner.handle
    }

    /// Returns `true` if the event is signalled, without consuming it.
    pub fn is_signalled(&self) -> bool {
        *self.inner.lock()
    }

    /// Consumes the signal if the event is signalled, without blocking.
    pub fn try_wait(&self) -> bool {
        let mut signalled = self.inner.lock();
        self.inner.consume(&mut signalled)
    }

    /// Blocks until the event is signalled.
    pub fn wait(&self) {
        let mut signalled = self.inner.lock();
        while !*signalled {
            signalled = self
                .inner
                .cvar
                .wait(signalled)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.inner.consume(&mut signalled);
    }

    /// Blocks until the event is signalled or `timeout` elapses.
    ///
    /// Returns `true` if the event was signalled. A timeout too large to
    /// represent as a deadline waits without one.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut signalled = self.inner.lock();
        while !*signalled {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            signalled = self
                .inner
                .cvar
                .wait_timeout(signalled, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        self.inner.consume(&mut signalled)
    }
}

impl core::fmt::Debug for ReadableEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReadableEvent")
            .field("handle", &self.inner.handle)
            .finish()
    }
}

/// State shared between the writable and readable halves.
struct Shared {
    handle: EventHandle,
    mode: ResetMode,
    signalled: Mutex<bool>,
    cvar: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.signalled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reports a signalled event to a waiter, clearing it in auto-reset mode.
    fn consume(&self, signalled: &mut bool) -> bool {
        if !*signalled {
            return false;
        }
        if self.mode == ResetMode::Auto {
            *signalled = false;
        }
        true
    }
}
