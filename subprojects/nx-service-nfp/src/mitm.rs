//! `nfp:user` manager: creates one IUser interface per client.

use std::sync::Arc;

use nx_amiibo::store::TagStore;

use crate::{device::DeviceSession, trigger::ActivateTrigger, user::UserInterface};

/// Replacement for the `nfp:user` IUserManager.
///
/// Every interface it creates shares the activate trigger and the tag store.
#[derive(Clone)]
pub struct NfpUserMitmService {
    trigger: Arc<ActivateTrigger>,
    store: Arc<dyn TagStore>,
}

impl NfpUserMitmService {
    /// Creates the manager.
    pub fn new(trigger: Arc<ActivateTrigger>, store: Arc<dyn TagStore>) -> Self {
        Self { trigger, store }
    }

    /// Returns the process-wide activate trigger.
    pub fn trigger(&self) -> &Arc<ActivateTrigger> {
        &self.trigger
    }

    /// Creates a new IUser interface (IUserManager command 0).
    pub fn create_user_interface(&self) -> UserInterface {
        let session = DeviceSession::new(self.trigger.clone(), self.store.clone());
        UserInterface::new(session)
    }
}

impl core::fmt::Debug for NfpUserMitmService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NfpUserMitmService")
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}
