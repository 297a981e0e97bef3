use std::sync::Arc;

use parking_lot::Mutex;

use camera_capture_core::models::buffer::SessionClock;
use camera_capture_core::models::camera_types::{DeviceDescription, MicrophoneInfo, PermissionStatus};
use camera_capture_core::models::error::CameraError;
use camera_capture_core::models::photo::Location;
use camera_capture_core::models::recording::RecorderSettings;
use camera_capture_core::traits::barcode_scanner::BarcodeScanner;
use camera_capture_core::traits::camera_hardware::{CameraHardware, SessionKind};
use camera_capture_core::traits::capture_device::CaptureDevice;
use camera_capture_core::traits::hardware_session::HardwareSession;
use camera_capture_core::traits::media_recorder::{MediaRecorder, RecorderErrorCallback};

use crate::device::{DeviceSpec, VirtualDevice};
use crate::error::VirtualCameraError;
use crate::hardware_log::HardwareLog;
use crate::recorder::{RecorderFailures, RecorderProbe, VirtualRecorder};
use crate::scanner::VirtualBarcodeScanner;
use crate::session::VirtualSession;

/// Host-clock offsets of the two sessions. They differ so that audio has to
/// be moved onto the video clock.
pub const VIDEO_CLOCK_OFFSET_NS: i64 = 1_000_000;
pub const AUDIO_CLOCK_OFFSET_NS: i64 = 5_000_000;

struct CameraState {
    available: bool,
    microphone: Option<MicrophoneInfo>,
    microphone_permission: PermissionStatus,
    location: Option<Location>,
    scanner_available: bool,
    recorder_failures: RecorderFailures,
}

/// A [`CameraHardware`] with a fixed device catalogue and fully inspectable
/// sessions, recorders and scanner.
pub struct VirtualCamera {
    log: Arc<HardwareLog>,
    devices: Mutex<Vec<Arc<VirtualDevice>>>,
    state: Mutex<CameraState>,
    sessions: Mutex<Vec<Arc<VirtualSession>>>,
    recorders: Mutex<Vec<Arc<RecorderProbe>>>,
    scanner: Arc<VirtualBarcodeScanner>,
}

impl Default for VirtualCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualCamera {
    /// An empty catalogue with a granted built-in microphone.
    pub fn new() -> Self {
        Self {
            log: Arc::new(HardwareLog::new()),
            devices: Mutex::new(Vec::new()),
            state: Mutex::new(CameraState {
                available: true,
                microphone: Some(MicrophoneInfo {
                    id: "builtin-mic".into(),
                    name: "Built-in Microphone".into(),
                }),
                microphone_permission: PermissionStatus::Granted,
                location: None,
                scanner_available: true,
                recorder_failures: RecorderFailures::default(),
            }),
            sessions: Mutex::new(Vec::new()),
            recorders: Mutex::new(Vec::new()),
            scanner: Arc::new(VirtualBarcodeScanner::new()),
        }
    }

    /// `back-wide` and `front` (see [`DeviceSpec`]).
    pub fn with_default_devices() -> Result<Self, VirtualCameraError> {
        let camera = Self::new();
        camera.add_device(DeviceSpec::back_wide())?;
        camera.add_device(DeviceSpec::front())?;
        Ok(camera)
    }

    pub fn add_device(&self, spec: DeviceSpec) -> Result<Arc<VirtualDevice>, VirtualCameraError> {
        let mut devices = self.devices.lock();
        if devices.iter().any(|device| device.spec().id == spec.id) {
            return Err(VirtualCameraError::DuplicateDevice(spec.id));
        }
        let device = Arc::new(VirtualDevice::new(spec, Arc::clone(&self.log))?);
        devices.push(Arc::clone(&device));
        Ok(device)
    }

    pub fn virtual_device(&self, id: &str) -> Option<Arc<VirtualDevice>> {
        self.devices.lock().iter().find(|device| device.spec().id == id).cloned()
    }

    pub fn log(&self) -> &Arc<HardwareLog> {
        &self.log
    }

    pub fn scanner(&self) -> &Arc<VirtualBarcodeScanner> {
        &self.scanner
    }

    fn session(&self, kind: SessionKind) -> Option<Arc<VirtualSession>> {
        self.sessions
            .lock()
            .iter()
            .rev()
            .find(|session| session.kind() == kind)
            .cloned()
    }

    /// The most recently created video session.
    pub fn video_session(&self) -> Option<Arc<VirtualSession>> {
        self.session(SessionKind::Video)
    }

    /// The most recently created audio session.
    pub fn audio_session(&self) -> Option<Arc<VirtualSession>> {
        self.session(SessionKind::Audio)
    }

    pub fn recorders(&self) -> Vec<Arc<RecorderProbe>> {
        self.recorders.lock().clone()
    }

    pub fn last_recorder(&self) -> Option<Arc<RecorderProbe>> {
        self.recorders.lock().last().cloned()
    }

    /// Pretend to run somewhere without camera hardware.
    pub fn set_available(&self, available: bool) {
        self.state.lock().available = available;
    }

    pub fn set_microphone(&self, microphone: Option<MicrophoneInfo>) {
        self.state.lock().microphone = microphone;
    }

    pub fn set_microphone_permission(&self, status: PermissionStatus) {
        self.state.lock().microphone_permission = status;
    }

    pub fn set_location(&self, location: Option<Location>) {
        self.state.lock().location = location;
    }

    pub fn set_scanner_available(&self, available: bool) {
        self.state.lock().scanner_available = available;
    }

    pub fn set_recorder_failures(&self, failures: RecorderFailures) {
        self.state.lock().recorder_failures = failures;
    }
}

impl CameraHardware for VirtualCamera {
    fn is_available(&self) -> bool {
        self.state.lock().available
    }

    fn devices(&self) -> Vec<DeviceDescription> {
        self.devices.lock().iter().map(|device| device.spec().description()).collect()
    }

    fn device(&self, id: &str) -> Option<Arc<dyn CaptureDevice>> {
        self.virtual_device(id).map(|device| device as Arc<dyn CaptureDevice>)
    }

    fn microphone(&self) -> Option<MicrophoneInfo> {
        self.state.lock().microphone.clone()
    }

    fn microphone_permission(&self) -> PermissionStatus {
        self.state.lock().microphone_permission
    }

    fn create_session(&self, kind: SessionKind) -> Arc<dyn HardwareSession> {
        let offset = match kind {
            SessionKind::Video => VIDEO_CLOCK_OFFSET_NS,
            SessionKind::Audio => AUDIO_CLOCK_OFFSET_NS,
        };
        let session = Arc::new(VirtualSession::new(kind, Arc::clone(&self.log), SessionClock::new(offset)));
        self.sessions.lock().push(Arc::clone(&session));
        session
    }

    fn create_recorder(
        &self,
        settings: &RecorderSettings,
        on_error: RecorderErrorCallback,
    ) -> Result<Box<dyn MediaRecorder>, CameraError> {
        let failures = self.state.lock().recorder_failures;
        let recorder = VirtualRecorder::new(settings.clone(), on_error, failures);
        self.recorders.lock().push(recorder.probe());
        log::debug!("Created virtual recorder for {}", settings.output_path.display());
        Ok(Box::new(recorder))
    }

    fn barcode_scanner(&self) -> Option<Arc<dyn BarcodeScanner>> {
        if self.state.lock().scanner_available {
            Some(Arc::clone(&self.scanner) as Arc<dyn BarcodeScanner>)
        } else {
            None
        }
    }

    fn last_known_location(&self) -> Option<Location> {
        self.state.lock().location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_device_is_rejected() {
        let camera = VirtualCamera::with_default_devices().unwrap();
        let err = camera.add_device(DeviceSpec::front()).unwrap_err();
        assert!(matches!(err, VirtualCameraError::DuplicateDevice(id) if id == "front"));
        assert_eq!(camera.devices().len(), 2);
    }

    #[test]
    fn sessions_get_distinct_clocks() {
        let camera = VirtualCamera::new();
        let video = camera.create_session(SessionKind::Video);
        let audio = camera.create_session(SessionKind::Audio);

        assert_eq!(video.clock().offset_from_host_ns, VIDEO_CLOCK_OFFSET_NS);
        assert_eq!(audio.clock().offset_from_host_ns, AUDIO_CLOCK_OFFSET_NS);
        assert_eq!(camera.video_session().unwrap().kind(), SessionKind::Video);
    }

    #[test]
    fn scanner_can_be_withdrawn() {
        let camera = VirtualCamera::new();
        assert!(camera.barcode_scanner().is_some());
        camera.set_scanner_available(false);
        assert!(camera.barcode_scanner().is_none());
    }

    #[test]
    fn unknown_device_is_none() {
        let camera = VirtualCamera::with_default_devices().unwrap();
        assert!(camera.device("back-wide").is_some());
        assert!(camera.device("tele").is_none());
    }
}
