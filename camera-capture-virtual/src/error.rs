use camera_capture_core::models::error::{CameraError, DeviceError};
use thiserror::Error;

/// Failures of the virtual backend itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VirtualCameraError {
    #[error("a device with the id \"{0}\" already exists")]
    DuplicateDevice(String),

    #[error("device \"{0}\" has no formats")]
    NoFormats(String),

    #[error("device \"{0}\" refused the configuration lock")]
    LockRefused(String),

    #[error("recorder failed: {0}")]
    Recorder(String),
}

impl From<VirtualCameraError> for CameraError {
    fn from(error: VirtualCameraError) -> Self {
        match error {
            VirtualCameraError::LockRefused(_) => DeviceError::ConfigurationFailed(error.to_string()).into(),
            other => CameraError::Unknown {
                message: other.to_string(),
                cause: Some("virtual camera".to_string()),
            },
        }
    }
}
