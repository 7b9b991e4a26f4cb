//! Key-combo monitor: emulates a tag tap when a button combination is pressed.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use nx_service_nfp::ActivateTrigger;

use crate::input::{InputError, InputSource, Keys};

/// Name of the polling thread.
pub const THREAD_NAME: &str = "hid-poller";

/// Polls an input source and raises the activate trigger on a key combo.
pub struct KeyComboMonitor<S> {
    source: S,
    combo: Keys,
    trigger: Arc<ActivateTrigger>,
    interval: Duration,
}

impl<S: InputSource> KeyComboMonitor<S> {
    /// Creates a monitor that fires when every key in `combo` is down.
    pub fn new(source: S, combo: Keys, trigger: Arc<ActivateTrigger>, interval: Duration) -> Self {
        Self {
            source,
            combo,
            trigger,
            interval,
        }
    }

    /// Runs one poll.
    ///
    /// Returns `true` if the trigger was raised by this poll. The input is
    /// sampled on every poll; presses made while a trigger is pending are
    /// dropped.
    pub fn poll(&mut self) -> Result<bool, InputError> {
        let keys = self.source.keys_down()?;
        if self.trigger.is_pending() {
            return Ok(false);
        }
        if self.combo.is_empty() || !keys.contains(self.combo) {
            return Ok(false);
        }

        tracing::debug!(?keys, "trigger combo pressed");
        Ok(self.trigger.raise())
    }
}

impl<S: InputSource + 'static> KeyComboMonitor<S> {
    /// Starts polling on a background thread.
    pub fn spawn(mut self) -> io::Result<MonitorHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_owned())
            .spawn(move || {
                tracing::info!(
                    combo = ?self.combo,
                    interval = ?self.interval,
                    "input monitor started"
                );
                while !thread_stop.load(Ordering::Acquire) {
                    if let Err(err) = self.poll() {
                        tracing::error!(%err, "input monitor stopped");
                        return;
                    }
                    thread::sleep(self.interval);
                }
                tracing::info!("input monitor stopped");
            })?;

        Ok(MonitorHandle { stop, thread })
    }
}

/// Handle to a running [`KeyComboMonitor`] thread.
pub struct MonitorHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl MonitorHandle {
    /// Returns `true` if the polling thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Stops the polling thread and waits for it to exit.
    pub fn stop(self) {
        self.stop.store(true, Ordering::Release);
        if self.thread.join().is_err() {
            tracing::error!("input monitor panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::VirtualPad;

    struct Unplugged;

    impl InputSource for Unplugged {
        fn keys_down(&mut self) -> Result<Keys, InputError> {
            Err(InputError::Disconnected)
        }
    }

    fn monitor(pad: &VirtualPad, trigger: &Arc<ActivateTrigger>) -> KeyComboMonitor<VirtualPad> {
        KeyComboMonitor::new(
            pad.clone(),
            Keys::L | Keys::R,
            trigger.clone(),
            Duration::from_millis(1),
        )
    }

    #[test]
    fn test_poll_raises_on_combo() {
        let pad = VirtualPad::new();
        let trigger = Arc::new(ActivateTrigger::new());
        let mut monitor = monitor(&pad, &trigger);

        assert!(!monitor.poll().unwrap());

        pad.press(Keys::L | Keys::R | Keys::A);
        assert!(monitor.poll().unwrap());
        assert!(trigger.is_pending());
    }

    #[test]
    fn test_poll_ignores_partial_combo() {
        let pad = VirtualPad::new();
        let trigger = Arc::new(ActivateTrigger::new());
        let mut monitor = monitor(&pad, &trigger);

        pad.press(Keys::L);
        assert!(!monitor.poll().unwrap());
        assert!(!trigger.is_pending());
    }

    #[test]
    fn test_press_while_pending_is_dropped() {
        let pad = VirtualPad::new();
        let trigger = Arc::new(ActivateTrigger::new());
        let mut monitor = monitor(&pad, &trigger);
        trigger.raise();

        pad.press(Keys::L | Keys::R);
        assert!(!monitor.poll().unwrap());

        trigger.take();
        assert!(!monitor.poll().unwrap());
        assert!(!trigger.is_pending());

        pad.press(Keys::L | Keys::R);
        assert!(monitor.poll().unwrap());
    }

    #[test]
    fn test_spawned_monitor_raises_and_stops() {
        let pad = VirtualPad::new();
        let trigger = Arc::new(ActivateTrigger::new());
        let handle = monitor(&pad, &trigger).spawn().unwrap();

        pad.press(Keys::L | Keys::R);
        assert!(trigger.event().wait_timeout(Duration::from_secs(5)));
        assert!(trigger.is_pending());

        handle.stop();
    }

    #[test]
    fn test_spawned_monitor_exits_on_input_error() {
        let trigger = Arc::new(ActivateTrigger::new());
        let handle = KeyComboMonitor::new(Unplugged, Keys::L, trigger, Duration::from_millis(1))
            .spawn()
            .unwrap();

        for _ in 0..500 {
            if handle.is_finished() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(handle.is_finished());
        handle.stop();
    }
}
