//! CMIF request and response types for the IUser interface.
//!
//! The transport hands each request over either typed ([`Request`]) or as the
//! raw command id plus arguments ([`RawRequest`]). Unknown command ids are
//! rejected before reaching the device session.

use nx_amiibo::raw::{CommonInfo, ModelInfo, TagInfo};
use nx_event::ReadableEvent;
use zerocopy::IntoBytes;

use crate::proto::{DeviceHandle, DeviceState, NpadId, State, cmds};

/// IUser command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Command {
    Initialize = cmds::INITIALIZE,
    Finalize = cmds::FINALIZE,
    ListDevices = cmds::LIST_DEVICES,
    StartDetection = cmds::START_DETECTION,
    StopDetection = cmds::STOP_DETECTION,
    Mount = cmds::MOUNT,
    Unmount = cmds::UNMOUNT,
    OpenApplicationArea = cmds::OPEN_APPLICATION_AREA,
    GetApplicationArea = cmds::GET_APPLICATION_AREA,
    GetTagInfo = cmds::GET_TAG_INFO,
    GetRegisterInfo = cmds::GET_REGISTER_INFO,
    GetCommonInfo = cmds::GET_COMMON_INFO,
    GetModelInfo = cmds::GET_MODEL_INFO,
    AttachActivateEvent = cmds::ATTACH_ACTIVATE_EVENT,
    AttachDeactivateEvent = cmds::ATTACH_DEACTIVATE_EVENT,
    GetState = cmds::GET_STATE,
    GetDeviceState = cmds::GET_DEVICE_STATE,
    GetNpadId = cmds::GET_NPAD_ID,
    GetApplicationAreaSize = cmds::GET_APPLICATION_AREA_SIZE,
    AttachAvailabilityChangeEvent = cmds::ATTACH_AVAILABILITY_CHANGE_EVENT,
}

impl Command {
    /// Every implemented command.
    pub const ALL: [Self; 20] = [
        Self::Initialize,
        Self::Finalize,
        Self::ListDevices,
        Self::StartDetection,
        Self::StopDetection,
        Self::Mount,
        Self::Unmount,
        Self::OpenApplicationArea,
        Self::GetApplicationArea,
        Self::GetTagInfo,
        Self::GetRegisterInfo,
        Self::GetCommonInfo,
        Self::GetModelInfo,
        Self::AttachActivateEvent,
        Self::AttachDeactivateEvent,
        Self::GetState,
        Self::GetDeviceState,
        Self::GetNpadId,
        Self::GetApplicationAreaSize,
        Self::AttachAvailabilityChangeEvent,
    ];

    /// Returns the CMIF command id.
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Whether the command is meant to run on an initialized session.
    pub const fn requires_initialized(self) -> bool {
        !matches!(self, Self::Initialize | Self::GetState)
    }
}

impl TryFrom<u32> for Command {
    type Error = UnknownCommandError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.id() == id)
            .ok_or(UnknownCommandError(id))
    }
}

/// Error returned for a command id the IUser interface does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown command id {0}")]
pub struct UnknownCommandError(pub u32);

/// An untyped request as received from the transport.
///
/// Arguments a command does not take are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    /// CMIF command id
    pub cmd_id: u32,
    /// Device handle argument
    pub device_handle: u64,
    /// Applet resource user id (`Initialize`)
    pub aruid: u64,
    /// Input buffer (`Initialize`)
    pub in_buffer: Vec<u8>,
}

/// A typed IUser request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Initialize { aruid: u64, in_buffer: Vec<u8> },
    Finalize,
    ListDevices,
    StartDetection,
    StopDetection,
    Mount,
    Unmount,
    OpenApplicationArea,
    GetApplicationArea,
    GetTagInfo,
    GetRegisterInfo,
    GetCommonInfo,
    GetModelInfo,
    AttachActivateEvent { device: DeviceHandle },
    AttachDeactivateEvent { device: DeviceHandle },
    GetState,
    GetDeviceState,
    GetNpadId { device: DeviceHandle },
    GetApplicationAreaSize,
    AttachAvailabilityChangeEvent,
}

impl Request {
    /// Builds a typed request from the raw command id and arguments.
    pub fn from_raw(raw: RawRequest) -> Result<Self, UnknownCommandError> {
        let device = DeviceHandle(raw.device_handle);
        let request = match Command::try_from(raw.cmd_id)? {
            Command::Initialize => Self::Initialize {
                aruid: raw.aruid,
                in_buffer: raw.in_buffer,
            },
            Command::Finalize => Self::Finalize,
            Command::ListDevices => Self::ListDevices,
            Command::StartDetection => Self::StartDetection,
            Command::StopDetection => Self::StopDetection,
            Command::Mount => Self::Mount,
            Command::Unmount => Self::Unmount,
            Command::OpenApplicationArea => Self::OpenApplicationArea,
            Command::GetApplicationArea => Self::GetApplicationArea,
            Command::GetTagInfo => Self::GetTagInfo,
            Command::GetRegisterInfo => Self::GetRegisterInfo,
            Command::GetCommonInfo => Self::GetCommonInfo,
            Command::GetModelInfo => Self::GetModelInfo,
            Command::AttachActivateEvent => Self::AttachActivateEvent { device },
            Command::AttachDeactivateEvent => Self::AttachDeactivateEvent { device },
            Command::GetState => Self::GetState,
            Command::GetDeviceState => Self::GetDeviceState,
            Command::GetNpadId => Self::GetNpadId { device },
            Command::GetApplicationAreaSize => Self::GetApplicationAreaSize,
            Command::AttachAvailabilityChangeEvent => Self::AttachAvailabilityChangeEvent,
        };
        Ok(request)
    }

    /// Returns the command this request invokes.
    pub fn command(&self) -> Command {
        match self {
            Self::Initialize { .. } => Command::Initialize,
            Self::Finalize => Command::Finalize,
            Self::ListDevices => Command::ListDevices,
            Self::StartDetection => Command::StartDetection,
            Self::StopDetection => Command::StopDetection,
            Self::Mount => Command::Mount,
            Self::Unmount => Command::Unmount,
            Self::OpenApplicationArea => Command::OpenApplicationArea,
            Self::GetApplicationArea => Command::GetApplicationArea,
            Self::GetTagInfo => Command::GetTagInfo,
            Self::GetRegisterInfo => Command::GetRegisterInfo,
            Self::GetCommonInfo => Command::GetCommonInfo,
            Self::GetModelInfo => Command::GetModelInfo,
            Self::AttachActivateEvent { .. } => Command::AttachActivateEvent,
            Self::AttachDeactivateEvent { .. } => Command::AttachDeactivateEvent,
            Self::GetState => Command::GetState,
            Self::GetDeviceState => Command::GetDeviceState,
            Self::GetNpadId { .. } => Command::GetNpadId,
            Self::GetApplicationAreaSize => Command::GetApplicationAreaSize,
            Self::AttachAvailabilityChangeEvent => Command::AttachAvailabilityChangeEvent,
        }
    }
}

/// A successful IUser response.
#[derive(Debug, Clone)]
pub enum Response {
    /// No output
    Empty,
    /// `GetState`
    State(State),
    /// `GetDeviceState`
    DeviceState(DeviceState),
    /// `ListDevices`
    Devices(Vec<DeviceHandle>),
    /// `GetNpadId`
    NpadId(NpadId),
    /// `Attach*Event`: copied event handle
    Event(ReadableEvent),
    /// `GetTagInfo`
    TagInfo(TagInfo),
    /// `GetModelInfo`
    ModelInfo(ModelInfo),
    /// `GetCommonInfo`
    CommonInfo(CommonInfo),
    /// `GetApplicationArea`, `GetApplicationAreaSize`
    Size(u32),
}

impl Response {
    /// Bytes written to the output buffer, if the command has one.
    pub fn out_buffer(&self) -> Option<Vec<u8>> {
        match self {
            Self::Devices(devices) => Some(
                devices
                    .iter()
                    .flat_map(|device| device.to_raw().to_le_bytes())
                    .collect(),
            ),
            Self::TagInfo(info) => Some(info.as_bytes().to_vec()),
            Self::ModelInfo(info) => Some(info.as_bytes().to_vec()),
            Self::CommonInfo(info) => Some(info.as_bytes().to_vec()),
            _ => None,
        }
    }

    /// Raw `u32` output value, if the command has one.
    pub fn out_value(&self) -> Option<u32> {
        match self {
            Self::State(state) => Some((*state).into()),
            Self::DeviceState(state) => Some((*state).into()),
            Self::Devices(devices) => Some(devices.len() as u32),
            Self::NpadId(id) => Some(id.to_raw()),
            Self::Size(size) => Some(*size),
            _ => None,
        }
    }

    /// Copied event handle, if the command returns one.
    pub fn copy_handle(&self) -> Option<&ReadableEvent> {
        match self {
            Self::Event(event) => Some(event),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_ids_roundtrip() {
        for cmd in Command::ALL {
            assert_eq!(Command::try_from(cmd.id()), Ok(cmd));
        }
    }

    #[test]
    fn test_unknown_command_ids() {
        for id in [9, 10, 11, 12, 24, 0xFFFF_FFFF] {
            assert_eq!(Command::try_from(id), Err(UnknownCommandError(id)));
        }
    }

    #[test]
    fn test_request_from_raw_keeps_arguments() {
        let request = Request::from_raw(RawRequest {
            cmd_id: cmds::GET_NPAD_ID,
            device_handle: 0x1234,
            ..RawRequest::default()
        })
        .unwrap();

        assert_eq!(
            request,
            Request::GetNpadId {
                device: DeviceHandle(0x1234)
            }
        );
        assert_eq!(request.command(), Command::GetNpadId);
    }

    #[test]
    fn test_request_command_matches_raw_id() {
        for cmd in Command::ALL {
            let request = Request::from_raw(RawRequest {
                cmd_id: cmd.id(),
                ..RawRequest::default()
            })
            .unwrap();
            assert_eq!(request.command(), cmd);
        }
    }

    #[test]
    fn test_list_devices_output() {
        let response = Response::Devices(vec![DeviceHandle::EMULATED]);

        assert_eq!(
            response.out_buffer(),
            Some(vec![0x59, 0x55, 0x5A, 0x55, 0, 0, 0, 0])
        );
        assert_eq!(response.out_value(), Some(1));
    }
}
