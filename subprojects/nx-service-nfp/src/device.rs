//! Reader device session and its state machine.
//!
//! ```text
//!                 start_detection
//!  Initialized ───────────────────▶ SearchingForTag
//!     ▲   ▲                              │
//!     │   │ stop_detection        trigger│(polled)
//!     │   │                              ▼
//!     │   └──────── stop_detection ── TagFound ◀──┐
//!     │              (deactivate)        │        │ unmount
//!     │                             mount│        │
//!     │                                  ▼        │
//!     └───────── stop_detection ──── TagNearby ───┘
//!                 (deactivate)
//! ```
//!
//! Operations invoked from a state where they have no effect leave the state
//! unchanged and still succeed.

use std::sync::Arc;

use nx_amiibo::{
    raw::{CommonInfo, ModelInfo, TagInfo},
    store::{LoadError, TagStore},
};
use nx_event::{ReadableEvent, SystemEvent};

use crate::{
    proto::{DeviceHandle, DeviceState, NpadId, State},
    result::ResultCode,
    trigger::ActivateTrigger,
};

/// A state-changing device operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    StartDetection,
    StopDetection,
    Mount,
    Unmount,
    /// The external trigger was consumed by a device state poll
    TagActivated,
}

/// Outcome of applying a [`Transition`] to a [`DeviceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// State after the transition
    pub next: DeviceState,
    /// Whether the deactivate event must be signalled
    pub signal_deactivate: bool,
}

impl DeviceState {
    /// Applies `transition` to this state.
    ///
    /// Total over every state and transition.
    pub fn step(self, transition: Transition) -> Step {
        use DeviceState as S;

        let (next, signal_deactivate) = match (transition, self) {
            (Transition::StartDetection, S::Initialized | S::TagRemoved) => {
                (S::SearchingForTag, false)
            }
            (Transition::StartDetection, state) => (state, false),
            (Transition::StopDetection, S::TagFound | S::TagNearby) => (S::Initialized, true),
            (Transition::StopDetection, S::SearchingForTag | S::TagRemoved) => {
                (S::Initialized, false)
            }
            (Transition::StopDetection, state) => (state, false),
            (Transition::Mount, _) => (S::TagNearby, false),
            (Transition::Unmount | Transition::TagActivated, _) => (S::TagFound, false),
        };
        Step {
            next,
            signal_deactivate,
        }
    }
}

/// One client's view of the emulated reader.
pub struct DeviceSession {
    state: State,
    device_state: DeviceState,
    /// Set once this session has taken the activate event; the session then
    /// no longer consumes the trigger when polled.
    owns_activate_event: bool,
    trigger: Arc<ActivateTrigger>,
    store: Arc<dyn TagStore>,
    deactivate_event: SystemEvent,
    availability_change_event: SystemEvent,
}

impl DeviceSession {
    /// Creates a session in the `NonInitialized`/`Initialized` state pair.
    pub fn new(trigger: Arc<ActivateTrigger>, store: Arc<dyn TagStore>) -> Self {
        Self {
            state: State::NonInitialized,
            device_state: DeviceState::Initialized,
            owns_activate_event: false,
            trigger,
            store,
            deactivate_event: SystemEvent::new(),
            availability_change_event: SystemEvent::new(),
        }
    }

    /// Initializes the library for this session.
    pub fn initialize(&mut self) {
        self.state = State::Initialized;
        self.device_state = DeviceState::Initialized;
    }

    /// Finalizes the library for this session.
    pub fn finalize(&mut self) {
        self.state = State::NonInitialized;
        self.device_state = DeviceState::Finalized;
    }

    /// Returns the library state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Polls the device state.
    ///
    /// If an activation is pending and this session has not attached the
    /// activate event, the activation is consumed and the device reports
    /// `TagFound`.
    pub fn device_state(&mut self) -> DeviceState {
        if !self.owns_activate_event && self.trigger.take() {
            tracing::info!(from = ?self.device_state, "tag activated on device state poll");
            self.apply(Transition::TagActivated);
        }
        self.device_state
    }

    /// Returns the device state without consuming a pending activation.
    pub fn current_device_state(&self) -> DeviceState {
        self.device_state
    }

    /// Returns `true` if this session has attached the shared activate event.
    pub fn owns_activate_event(&self) -> bool {
        self.owns_activate_event
    }

    /// Starts searching for a tag.
    pub fn start_detection(&mut self) {
        self.apply(Transition::StartDetection);
    }

    /// Stops searching for a tag, signalling deactivation if one was present.
    pub fn stop_detection(&mut self) {
        self.apply(Transition::StopDetection);
    }

    /// Mounts the tag.
    pub fn mount(&mut self) {
        self.apply(Transition::Mount);
    }

    /// Unmounts the tag.
    pub fn unmount(&mut self) {
        self.apply(Transition::Unmount);
    }

    /// Lists the reader devices.
    pub fn list_devices(&self) -> [DeviceHandle; 1] {
        [DeviceHandle::EMULATED]
    }

    /// Returns the controller the reader is attached to.
    pub fn npad_id(&self, _device: DeviceHandle) -> NpadId {
        NpadId::PLAYER_1
    }

    /// Attaches the shared activate event.
    ///
    /// From now on this session leaves pending activations to whoever waits
    /// on the event.
    pub fn attach_activate_event(&mut self, _device: DeviceHandle) -> ReadableEvent {
        self.owns_activate_event = true;
        self.trigger.event()
    }

    /// Attaches this session's deactivate event.
    pub fn attach_deactivate_event(&self, _device: DeviceHandle) -> ReadableEvent {
        self.deactivate_event.readable()
    }

    /// Attaches this session's availability change event.
    pub fn attach_availability_change_event(&self) -> ReadableEvent {
        self.availability_change_event.readable()
    }

    /// Reads the tag identity from the tag store.
    pub fn tag_info(&self) -> Result<TagInfo, ReadTagError> {
        let image = self.store.load()?;
        tracing::debug!(amiibo = %image.amiibo_id(), "read tag info");
        Ok(image.tag_info())
    }

    /// Reads the tag model info from the tag store.
    pub fn model_info(&self) -> Result<ModelInfo, ReadTagError> {
        let image = self.store.load()?;
        tracing::debug!(amiibo = %image.amiibo_id(), "read model info");
        Ok(image.model_info())
    }

    /// Returns the common info of the tag.
    ///
    /// Writes are not emulated, so this never touches the tag store.
    pub fn common_info(&self) -> CommonInfo {
        CommonInfo::empty()
    }

    /// Opens the application area. Not emulated.
    pub fn open_application_area(&self) {}

    /// Returns the application area. Not emulated, always 0.
    pub fn application_area(&self) -> u32 {
        0
    }

    /// Returns the application area size. Not emulated, always 0.
    pub fn application_area_size(&self) -> u32 {
        0
    }

    /// Reads the register info. Not emulated.
    pub fn register_info(&self) {}

    fn apply(&mut self, transition: Transition) {
        let from = self.device_state;
        let step = from.step(transition);

        if step.signal_deactivate {
            self.deactivate_event.signal();
        }
        if step.next == from && transition != Transition::TagActivated {
            tracing::debug!(?transition, state = ?from, "transition has no effect");
        }
        self.device_state = step.next;
    }
}

impl core::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("state", &self.state)
            .field("device_state", &self.device_state)
            .field("owns_activate_event", &self.owns_activate_event)
            .finish_non_exhaustive()
    }
}

/// Error returned when the tag image cannot be read.
#[derive(Debug, thiserror::Error)]
#[error("no tag available")]
pub struct ReadTagError(#[from] LoadError);

impl ReadTagError {
    /// Result code reported to the client.
    pub fn result_code(&self) -> ResultCode {
        ResultCode::TAG_NOT_FOUND
    }
}
