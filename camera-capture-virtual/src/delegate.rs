use parking_lot::Mutex;

use camera_capture_core::models::camera_types::{Code, CodeScannerFrame, ShutterType};
use camera_capture_core::models::error::CameraError;
use camera_capture_core::traits::camera_delegate::CameraSessionDelegate;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Error(CameraError),
    Initialized,
    Started,
    Stopped,
    Shutter(ShutterType),
    CodeScanned(Vec<Code>, CodeScannerFrame),
}

/// A [`CameraSessionDelegate`] that records every event in order.
#[derive(Debug, Default)]
pub struct CollectingDelegate {
    events: Mutex<Vec<SessionEvent>>,
}

impl CollectingDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    /// Codes of every reported error, in order.
    pub fn error_codes(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SessionEvent::Error(error) => Some(error.code()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: SessionEvent) {
        self.events.lock().push(event);
    }
}

impl CameraSessionDelegate for CollectingDelegate {
    fn on_error(&self, error: &CameraError) {
        self.push(SessionEvent::Error(error.clone()));
    }

    fn on_initialized(&self) {
        self.push(SessionEvent::Initialized);
    }

    fn on_started(&self) {
        self.push(SessionEvent::Started);
    }

    fn on_stopped(&self) {
        self.push(SessionEvent::Stopped);
    }

    fn on_shutter(&self, shutter_type: ShutterType) {
        self.push(SessionEvent::Shutter(shutter_type));
    }

    fn on_code_scanned(&self, codes: &[Code], frame: CodeScannerFrame) {
        self.push(SessionEvent::CodeScanned(codes.to_vec(), frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_capture_core::models::error::DeviceError;

    #[test]
    fn keeps_event_order() {
        let delegate = CollectingDelegate::new();
        delegate.on_initialized();
        delegate.on_error(&CameraError::from(DeviceError::NoDevice));
        delegate.on_started();

        assert_eq!(delegate.error_codes(), vec!["device/no-device"]);
        assert_eq!(delegate.events().len(), 3);
        assert_eq!(delegate.events()[2], SessionEvent::Started);

        delegate.clear();
        assert!(delegate.events().is_empty());
    }
}
