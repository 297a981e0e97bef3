//! # camera-capture-core
//!
//! Platform-agnostic camera session core.
//!
//! Takes a declarative, frequently changing [`CameraConfiguration`] and
//! converges a live hardware capture session towards it: only the phases whose
//! inputs changed are re-applied, in dependency order, under the session and
//! device configuration locks, while frames keep streaming. Platform backends
//! implement the traits in [`traits`] and plug into the generic
//! [`CameraSession`].
//!
//! ## Architecture
//!
//! ```text
//! camera-capture-core (this crate)
//! ├── traits/       ← CameraHardware, CaptureDevice, HardwareSession, MediaRecorder, BarcodeScanner, delegates
//! ├── models/       ← CameraConfiguration, Difference, CameraError, formats, union values
//! ├── processing/   ← Frame, FrameDispatcher, CodeScannerPipeline, bit-rate selection
//! ├── session/      ← CameraSession (reconciliation), lifecycle, RecordingSession, photo capture
//! └── storage/      ← output files, photo metadata sidecars
//! ```
//!
//! ## Data flow
//!
//! ```text
//! configure(mutator) → draft → Difference → [session lock] input, outputs, stabilization, orientation
//!                                         → [device lock]  format, pixel format, fps, zoom, exposure
//!                                         → start/stop → [device lock] torch → on_initialized
//!
//! video buffer → Frame (ref-counted) ─┬→ PreviewTarget
//!                                     ├→ RecordingSession → MediaRecorder
//!                                     ├→ FrameProcessor
//!                                     └→ CodeScannerPipeline → BarcodeScanner
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::buffer::{MediaType, SampleBuffer, SessionClock};
pub use models::camera_types::{
    Code, CodeScannerFrame, CodeType, DeviceDescription, DevicePosition, Flash, MicrophoneInfo, Orientation,
    PermissionStatus, Point, Rect, ShutterType, Torch,
};
pub use models::config::{
    CameraConfiguration, CodeScannerOptions, OutputConfiguration, PhotoOutputOptions, VideoOutputOptions,
};
pub use models::difference::Difference;
pub use models::error::{
    CameraError, CaptureError, CodeScannerError, DeviceError, ErrorEvent, FormatError, FrameError, ParameterError,
    PermissionError, SessionError,
};
pub use models::format::{DeviceFormat, FormatDescriptor, FrameRateRange, PixelFormat, Size, VideoStabilizationMode};
pub use models::photo::{CapturedPhoto, Location, Photo, PhotoCaptureSettings, QualityPrioritization, TakePhotoOptions};
pub use models::recording::{RecordVideoOptions, RecorderSettings, Video, VideoCodec, VideoFileType};
pub use models::state::{RecordingState, RunState};
pub use processing::frame::Frame;
pub use processing::frame_dispatcher::DispatchStats;
pub use session::camera_session::CameraSession;
pub use session::photo::PhotoCapture;
pub use session::recording::RecordingSession;
pub use traits::barcode_scanner::{BarcodeScanner, ScanCompletion};
pub use traits::camera_delegate::CameraSessionDelegate;
pub use traits::camera_hardware::{CameraHardware, SessionKind};
pub use traits::capture_device::CaptureDevice;
pub use traits::clock::{Clock, SystemClock};
pub use traits::frame_consumer::{FrameProcessor, PreviewTarget};
pub use traits::hardware_session::{
    AudioBufferCallback, BufferPool, HardwareSession, OutputKind, PhotoCapabilities, PhotoCaptureHandler,
    PhotoOutputSettings, RuntimeErrorCallback, SessionInput, SessionOutput, SubscriptionId, VideoBufferCallback,
    VideoOutputSettings,
};
pub use traits::media_recorder::{
    MediaRecorder, RecorderErrorCallback, RECORDER_ERROR_SERVER_DIED, RECORDER_ERROR_UNKNOWN,
};
