pub mod barcode_scanner;
pub mod camera_delegate;
pub mod camera_hardware;
pub mod capture_device;
pub mod clock;
pub mod frame_consumer;
pub mod hardware_session;
pub mod media_recorder;
