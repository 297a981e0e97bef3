//! # camera-capture-virtual
//!
//! In-process camera backend for camera-capture-kit.
//!
//! Provides:
//! - `VirtualCamera`: device catalogue, session and recorder factory
//! - `VirtualSession`: hardware session driven by explicit frame, audio and error injection
//! - `VirtualDevice`: capture device with configuration-lock bookkeeping
//! - `VirtualRecorder` / `RecorderProbe`: file-writing recorder sink with inspectable calls
//! - `VirtualBarcodeScanner`: code decoder whose results are scripted
//! - `HardwareLog`: ordered record of every hardware mutation
//!
//! Nothing here touches real hardware, so it runs on CI hosts and backs the
//! end-to-end tests of the reconciliation engine.
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use camera_capture_core::{CameraSession, OutputConfiguration};
//! use camera_capture_virtual::{CollectingDelegate, VirtualCamera};
//!
//! let camera = Arc::new(VirtualCamera::with_default_devices()?);
//! let delegate = Arc::new(CollectingDelegate::new());
//! let session = CameraSession::new(camera.clone(), delegate.clone());
//! session.configure(|config| {
//!     config.camera_id = Some("back-wide".into());
//!     config.video = OutputConfiguration::Enabled(Default::default());
//!     config.is_active = true;
//!     Ok(())
//! });
//! session.wait_until_idle();
//! camera.video_session().unwrap().emit_video_frame(33_000_000, 1920, 1080);
//! ```

pub mod camera;
pub mod clock;
pub mod delegate;
pub mod device;
pub mod error;
pub mod hardware_log;
pub mod pool;
pub mod recorder;
pub mod scanner;
pub mod session;

pub use camera::{VirtualCamera, AUDIO_CLOCK_OFFSET_NS, VIDEO_CLOCK_OFFSET_NS};
pub use clock::ManualClock;
pub use delegate::{CollectingDelegate, SessionEvent};
pub use device::{hd_format, uhd_format, DeviceSpec, VirtualDevice};
pub use error::VirtualCameraError;
pub use hardware_log::HardwareLog;
pub use pool::VirtualBufferPool;
pub use recorder::{RecorderFailures, RecorderProbe, VirtualRecorder};
pub use scanner::VirtualBarcodeScanner;
pub use session::{SessionBehavior, VirtualSession};

#[cfg(test)]
mod session_tests;
