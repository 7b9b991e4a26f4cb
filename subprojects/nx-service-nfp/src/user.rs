//! IUser service object.
//!
//! Pure dispatch: every command maps to one [`DeviceSession`] call.

use crate::{
    cmif::{RawRequest, Request, Response, UnknownCommandError},
    device::{DeviceSession, ReadTagError},
    proto::State,
    result::ResultCode,
};

/// The IUser interface handed to one client.
#[derive(Debug)]
pub struct UserInterface {
    session: DeviceSession,
}

impl UserInterface {
    /// Wraps a device session.
    pub fn new(session: DeviceSession) -> Self {
        tracing::info!("creating user interface");
        Self { session }
    }

    /// Returns the underlying device session.
    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    /// Handles a raw request.
    pub fn dispatch_raw(&mut self, raw: RawRequest) -> Result<Response, DispatchError> {
        let request = Request::from_raw(raw)?;
        self.dispatch(request)
    }

    /// Handles a typed request.
    pub fn dispatch(&mut self, request: Request) -> Result<Response, DispatchError> {
        let command = request.command();
        tracing::debug!(cmd_id = command.id(), ?command, "dispatching command");

        if command.requires_initialized() && self.session.state() == State::NonInitialized {
            // Same results as on an initialized session.
            tracing::warn!(?command, "command invoked on a non-initialized session");
        }

        let session = &mut self.session;
        let response = match request {
            Request::Initialize { aruid, in_buffer } => {
                tracing::debug!(aruid, in_len = in_buffer.len(), "initialize");
                session.initialize();
                Response::Empty
            }
            Request::Finalize => {
                session.finalize();
                Response::Empty
            }
            Request::ListDevices => Response::Devices(session.list_devices().to_vec()),
            Request::StartDetection => {
                session.start_detection();
                Response::Empty
            }
            Request::StopDetection => {
                session.stop_detection();
                Response::Empty
            }
            Request::Mount => {
                session.mount();
                Response::Empty
            }
            Request::Unmount => {
                session.unmount();
                Response::Empty
            }
            Request::OpenApplicationArea => {
                session.open_application_area();
                Response::Empty
            }
            Request::GetApplicationArea => Response::Size(session.application_area()),
            Request::GetTagInfo => Response::TagInfo(session.tag_info()?),
            Request::GetRegisterInfo => {
                session.register_info();
                Response::Empty
            }
            Request::GetCommonInfo => Response::CommonInfo(session.common_info()),
            Request::GetModelInfo => Response::ModelInfo(session.model_info()?),
            Request::AttachActivateEvent { device } => {
                Response::Event(session.attach_activate_event(device))
            }
            Request::AttachDeactivateEvent { device } => {
                Response::Event(session.attach_deactivate_event(device))
            }
            Request::GetState => Response::State(session.state()),
            Request::GetDeviceState => Response::DeviceState(session.device_state()),
            Request::GetNpadId { device } => Response::NpadId(session.npad_id(device)),
            Request::GetApplicationAreaSize => Response::Size(session.application_area_size()),
            Request::AttachAvailabilityChangeEvent => {
                Response::Event(session.attach_availability_change_event())
            }
        };

        tracing::trace!(?command, ?response, "command done");
        Ok(response)
    }
}

impl Drop for UserInterface {
    fn drop(&mut self) {
        tracing::info!("destroying user interface");
    }
}

/// Error returned by [`UserInterface::dispatch`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The command id is not part of the IUser interface.
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommandError),
    /// The tag image could not be read.
    #[error("failed to read tag")]
    ReadTag(#[from] ReadTagError),
}

impl DispatchError {
    /// Result code reported to the client.
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::UnknownCommand(_) => ResultCode::UNKNOWN_COMMAND_ID,
            Self::ReadTag(err) => err.result_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        proto::{DeviceHandle, DeviceState, NpadId, cmds},
        testing::{MissingTagStore, StaticTagStore},
        trigger::ActivateTrigger,
    };

    fn interface() -> UserInterface {
        UserInterface::new(DeviceSession::new(
            Arc::new(ActivateTrigger::new()),
            Arc::new(StaticTagStore::sample()),
        ))
    }

    fn raw(cmd_id: u32) -> RawRequest {
        RawRequest {
            cmd_id,
            device_handle: DeviceHandle::EMULATED.to_raw(),
            ..RawRequest::default()
        }
    }

    #[test]
    fn test_initialize_then_get_state() {
        let mut iface = interface();

        let state = iface.dispatch(Request::GetState).unwrap();
        assert_eq!(state.out_value(), Some(0));

        iface.dispatch_raw(raw(cmds::INITIALIZE)).unwrap();
        let state = iface.dispatch(Request::GetState).unwrap();
        assert_eq!(state.out_value(), Some(1));
    }

    #[test]
    fn test_detection_flow() {
        let mut iface = interface();
        iface.dispatch_raw(raw(cmds::INITIALIZE)).unwrap();
        iface.dispatch_raw(raw(cmds::START_DETECTION)).unwrap();

        let state = iface.dispatch_raw(raw(cmds::GET_DEVICE_STATE)).unwrap();
        assert_eq!(
            state.out_value(),
            Some(u32::from(DeviceState::SearchingForTag))
        );

        iface.dispatch_raw(raw(cmds::MOUNT)).unwrap();
        let state = iface.dispatch_raw(raw(cmds::GET_DEVICE_STATE)).unwrap();
        assert_eq!(state.out_value(), Some(u32::from(DeviceState::TagNearby)));

        iface.dispatch_raw(raw(cmds::UNMOUNT)).unwrap();
        let state = iface.dispatch_raw(raw(cmds::GET_DEVICE_STATE)).unwrap();
        assert_eq!(state.out_value(), Some(u32::from(DeviceState::TagFound)));
    }

    #[test]
    fn test_tag_buffers() {
        let mut iface = interface();

        let tag_info = iface.dispatch_raw(raw(cmds::GET_TAG_INFO)).unwrap();
        let bytes = tag_info.out_buffer().unwrap();
        assert_eq!(bytes.len(), 0x54);
        assert_eq!(&bytes[..10], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(bytes[10], 10);

        let model_info = iface.dispatch_raw(raw(cmds::GET_MODEL_INFO)).unwrap();
        let bytes = model_info.out_buffer().unwrap();
        assert_eq!(bytes.len(), 0x40);
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 2]);

        let common_info = iface.dispatch_raw(raw(cmds::GET_COMMON_INFO)).unwrap();
        assert_eq!(common_info.out_buffer(), Some(vec![0u8; 0x40]));
    }

    #[test]
    fn test_application_area_is_empty() {
        let mut iface = interface();

        for cmd in [cmds::GET_APPLICATION_AREA, cmds::GET_APPLICATION_AREA_SIZE] {
            let response = iface.dispatch_raw(raw(cmd)).unwrap();
            assert_eq!(response.out_value(), Some(0));
        }
        for cmd in [cmds::OPEN_APPLICATION_AREA, cmds::GET_REGISTER_INFO] {
            let response = iface.dispatch_raw(raw(cmd)).unwrap();
            assert!(matches!(response, Response::Empty));
        }
    }

    #[test]
    fn test_device_queries() {
        let mut iface = interface();

        let devices = iface.dispatch(Request::ListDevices).unwrap();
        assert_eq!(devices.out_value(), Some(1));

        let npad = iface
            .dispatch(Request::GetNpadId {
                device: DeviceHandle::EMULATED,
            })
            .unwrap();
        assert_eq!(npad.out_value(), Some(NpadId::PLAYER_1.to_raw()));
    }

    #[test]
    fn test_attach_events_return_handles() {
        let mut iface = interface();

        for cmd in [
            cmds::ATTACH_ACTIVATE_EVENT,
            cmds::ATTACH_DEACTIVATE_EVENT,
            cmds::ATTACH_AVAILABILITY_CHANGE_EVENT,
        ] {
            let response = iface.dispatch_raw(raw(cmd)).unwrap();
            assert!(response.copy_handle().unwrap().handle().is_valid());
        }
        assert!(iface.session().owns_activate_event());
    }

    #[test]
    fn test_unknown_command_rejected() {
        let mut iface = interface();

        let err = iface.dispatch_raw(raw(9)).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand(UnknownCommandError(9))));
        assert_eq!(err.result_code(), ResultCode::UNKNOWN_COMMAND_ID);
    }

    #[test]
    fn test_missing_tag_reports_result_code() {
        let mut iface = UserInterface::new(DeviceSession::new(
            Arc::new(ActivateTrigger::new()),
            Arc::new(MissingTagStore),
        ));

        let err = iface.dispatch(Request::GetTagInfo).unwrap_err();
        assert_eq!(err.result_code(), ResultCode::TAG_NOT_FOUND);

        // The session keeps working after a failed read.
        let state = iface.dispatch(Request::GetDeviceState).unwrap();
        assert_eq!(state.out_value(), Some(0));
    }
}
