use std::sync::Arc;

use crate::models::error::CameraError;
use crate::traits::capture_device::CaptureDevice;
use crate::traits::hardware_session::HardwareSession;

/// Holds a hardware session open for configuration; commits on drop.
pub struct SessionConfigurationGuard<'a> {
    session: &'a dyn HardwareSession,
}

impl<'a> SessionConfigurationGuard<'a> {
    pub fn begin(session: &'a dyn HardwareSession) -> Self {
        log::debug!("Beginning session configuration...");
        session.begin_configuration();
        Self { session }
    }
}

impl Drop for SessionConfigurationGuard<'_> {
    fn drop(&mut self) {
        self.session.commit_configuration();
        log::debug!("Committed session configuration");
    }
}

/// Holds a capture device locked for configuration; unlocks on drop.
pub struct DeviceConfigurationGuard {
    device: Arc<dyn CaptureDevice>,
}

impl DeviceConfigurationGuard {
    pub fn lock(device: Arc<dyn CaptureDevice>) -> Result<Self, CameraError> {
        log::debug!("Locking device {} for configuration...", device.id());
        device.lock_for_configuration()?;
        Ok(Self { device })
    }

    pub fn device(&self) -> &dyn CaptureDevice {
        self.device.as_ref()
    }
}

impl Drop for DeviceConfigurationGuard {
    fn drop(&mut self) {
        self.device.unlock_for_configuration();
        log::debug!("Unlocked device {}", self.device.id());
    }
}
