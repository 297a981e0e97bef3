use std::sync::Arc;

use crate::models::camera_types::{DeviceDescription, MicrophoneInfo, PermissionStatus};
use crate::models::error::CameraError;
use crate::models::photo::Location;
use crate::models::recording::RecorderSettings;
use crate::traits::barcode_scanner::BarcodeScanner;
use crate::traits::capture_device::CaptureDevice;
use crate::traits::hardware_session::HardwareSession;
use crate::traits::media_recorder::{MediaRecorder, RecorderErrorCallback};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Video,
    Audio,
}

/// Entry point into a platform camera stack.
///
/// Read-only capability oracle plus factory for sessions and recorders.
/// Implemented by:
/// - `VirtualCamera` (in-process, no hardware)
pub trait CameraHardware: Send + Sync {
    /// Whether cameras exist in this execution environment at all.
    fn is_available(&self) -> bool;

    /// List all camera devices.
    fn devices(&self) -> Vec<DeviceDescription>;

    /// Look up a camera device by its stable identifier.
    fn device(&self, id: &str) -> Option<Arc<dyn CaptureDevice>>;

    /// The default microphone, if any.
    fn microphone(&self) -> Option<MicrophoneInfo>;

    fn microphone_permission(&self) -> PermissionStatus;

    /// Create a new, empty hardware session.
    fn create_session(&self, kind: SessionKind) -> Arc<dyn HardwareSession>;

    /// Create an encoder/muxer sink. `on_error` fires for asynchronous
    /// recorder failures with the platform's `(what, extra)` codes.
    fn create_recorder(
        &self,
        settings: &RecorderSettings,
        on_error: RecorderErrorCallback,
    ) -> Result<Box<dyn MediaRecorder>, CameraError>;

    /// The code decoder used by the code scanner pipeline.
    fn barcode_scanner(&self) -> Option<Arc<dyn BarcodeScanner>>;

    fn last_known_location(&self) -> Option<Location>;
}
