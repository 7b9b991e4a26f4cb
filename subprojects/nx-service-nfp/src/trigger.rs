//! Process-wide activation trigger.
//!
//! The input monitor stands in for a physical tag tap: it raises a pending
//! flag and signals the activate event shared by every session. A session
//! that has not attached the activate event consumes the flag the next time
//! its device state is polled.
//!
//! The flag and the event are updated under one lock, so a raise and a
//! concurrent take can never leave the event signalled with no pending flag.

use std::sync::{Mutex, MutexGuard, PoisonError};

use nx_event::{EventHandle, ReadableEvent, SystemEvent};

/// Pending activation flag paired with the shared activate event.
#[derive(Debug)]
pub struct ActivateTrigger {
    pending: Mutex<bool>,
    event: SystemEvent,
}

impl ActivateTrigger {
    /// Creates a trigger with no pending activation.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(false),
            event: SystemEvent::new(),
        }
    }

    /// Raises the trigger and signals the activate event.
    ///
    /// Returns `false` without signalling if an activation is already pending.
    pub fn raise(&self) -> bool {
        let mut pending = self.lock();
        if *pending {
            return false;
        }
        *pending = true;
        self.event.signal();
        tracing::info!("tag activation triggered");
        true
    }

    /// Consumes a pending activation and clears the activate event.
    ///
    /// Returns `true` if an activation was pending.
    pub fn take(&self) -> bool {
        let mut pending = self.lock();
        if !*pending {
            return false;
        }
        *pending = false;
        self.event.clear();
        tracing::debug!("tag activation consumed");
        true
    }

    /// Returns `true` if an activation is pending.
    pub fn is_pending(&self) -> bool {
        *self.lock()
    }

    /// Returns a readable handle to the shared activate event.
    pub fn event(&self) -> ReadableEvent {
        self.event.readable()
    }

    /// Returns the handle value of the shared activate event.
    pub fn handle(&self) -> EventHandle {
        self.event.handle()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ActivateTrigger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn test_raise_signals_event() {
        let trigger = ActivateTrigger::new();
        let event = trigger.event();

        assert!(trigger.raise());
        assert!(trigger.is_pending());
        assert!(event.is_signalled());
    }

    #[test]
    fn test_raise_while_pending_is_ignored() {
        let trigger = ActivateTrigger::new();
        let event = trigger.event();

        assert!(trigger.raise());
        assert!(event.try_wait());

        assert!(!trigger.raise());
        assert!(!event.is_signalled());
    }

    #[test]
    fn test_take_clears_flag_and_event() {
        let trigger = ActivateTrigger::new();
        let event = trigger.event();

        trigger.raise();
        assert!(trigger.take());
        assert!(!trigger.is_pending());
        assert!(!event.is_signalled());

        assert!(!trigger.take());
    }

    #[test]
    fn test_concurrent_raise_and_take_stay_consistent() {
        let trigger = Arc::new(ActivateTrigger::new());
        let event = trigger.event();

        let raiser = {
            let trigger = trigger.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    trigger.raise();
                }
            })
        };
        for _ in 0..1000 {
            trigger.take();
        }
        raiser.join().unwrap();

        assert_eq!(trigger.is_pending(), event.is_signalled());
    }
}
