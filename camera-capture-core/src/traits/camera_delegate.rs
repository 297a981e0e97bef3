use crate::models::camera_types::{Code, CodeScannerFrame, ShutterType};
use crate::models::error::CameraError;

/// Event delegate for camera session notifications.
///
/// Methods are called from the camera, video or scanner threads, never from
/// the caller's thread. Implementations should marshal to the UI thread if needed.
pub trait CameraSessionDelegate: Send + Sync {
    /// Called for every configuration, runtime or pipeline error.
    fn on_error(&self, error: &CameraError);

    /// Called after a (new) input device has been configured.
    fn on_initialized(&self);

    /// Called when the hardware session transitions to running.
    fn on_started(&self);

    /// Called when the hardware session transitions to stopped.
    fn on_stopped(&self);

    /// Called when the hardware begins exposing a photo.
    fn on_shutter(&self, shutter_type: ShutterType);

    /// Called with the codes found in one scanned frame (never empty).
    fn on_code_scanned(&self, codes: &[Code], frame: CodeScannerFrame);
}
