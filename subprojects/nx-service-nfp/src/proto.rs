//! NFP protocol constants and types.

/// Service name intercepted by the emulator.
pub const SERVICE_NAME: &str = "nfp:user";

/// IUser command IDs
pub mod cmds {
    pub const INITIALIZE: u32 = 0;
    pub const FINALIZE: u32 = 1;
    pub const LIST_DEVICES: u32 = 2;
    pub const START_DETECTION: u32 = 3;
    pub const STOP_DETECTION: u32 = 4;
    pub const MOUNT: u32 = 5;
    pub const UNMOUNT: u32 = 6;
    pub const OPEN_APPLICATION_AREA: u32 = 7;
    pub const GET_APPLICATION_AREA: u32 = 8;

    // 9-12 (write/flush/restore/create) are not emulated

    pub const GET_TAG_INFO: u32 = 13;
    pub const GET_REGISTER_INFO: u32 = 14;
    pub const GET_COMMON_INFO: u32 = 15;
    pub const GET_MODEL_INFO: u32 = 16;
    pub const ATTACH_ACTIVATE_EVENT: u32 = 17;
    pub const ATTACH_DEACTIVATE_EVENT: u32 = 18;
    pub const GET_STATE: u32 = 19;
    pub const GET_DEVICE_STATE: u32 = 20;
    pub const GET_NPAD_ID: u32 = 21;
    pub const GET_APPLICATION_AREA_SIZE: u32 = 22;
    pub const ATTACH_AVAILABILITY_CHANGE_EVENT: u32 = 23;
}

/// Opaque handle of an NFC reader device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DeviceHandle(pub u64);

impl DeviceHandle {
    /// The single emulated reader (`'YUZU'`).
    pub const EMULATED: Self = Self(0x555A_5559);

    /// Returns the raw handle value.
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

/// Controller (Npad) identifier a reader is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NpadId(pub u32);

impl NpadId {
    /// Player 1 controller.
    pub const PLAYER_1: Self = Self(0);

    /// Returns the raw id value.
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

/// Library state of an IUser session (`GetState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum State {
    #[default]
    NonInitialized = 0,
    Initialized = 1,
}

/// Reader device state (`GetDeviceState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum DeviceState {
    #[default]
    Initialized = 0,
    SearchingForTag = 1,
    TagFound = 2,
    TagRemoved = 3,
    TagNearby = 4,
    /// Reserved, never entered
    Unknown5 = 5,
    Finalized = 6,
}

impl DeviceState {
    /// Every device state, in wire order.
    pub const ALL: [Self; 7] = [
        Self::Initialized,
        Self::SearchingForTag,
        Self::TagFound,
        Self::TagRemoved,
        Self::TagNearby,
        Self::Unknown5,
        Self::Finalized,
    ];
}

impl From<State> for u32 {
    fn from(value: State) -> Self {
        value as u32
    }
}

impl From<DeviceState> for u32 {
    fn from(value: DeviceState) -> Self {
        value as u32
    }
}

impl TryFrom<u32> for DeviceState {
    type Error = InvalidDeviceStateError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(InvalidDeviceStateError(value))
    }
}

/// Error returned when converting an out-of-range value into a [`DeviceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid device state {0}")]
pub struct InvalidDeviceStateError(pub u32);
