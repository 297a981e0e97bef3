use std::sync::Arc;

use crate::models::buffer::SampleBuffer;
use crate::models::error::CameraError;

/// Asynchronous recorder failure: `(what, extra)` as reported by the platform.
pub type RecorderErrorCallback = Arc<dyn Fn(i32, i32) + Send + Sync + 'static>;

/// `what` code for an unspecified recorder failure.
pub const RECORDER_ERROR_UNKNOWN: i32 = 1;
/// `what` code for the media server dying underneath the recorder.
pub const RECORDER_ERROR_SERVER_DIED: i32 = 100;

/// Opaque encoder + muxer writing one container file.
pub trait MediaRecorder: Send {
    /// Prepare encoders and open the output file.
    fn prepare(&mut self) -> Result<(), CameraError>;

    fn start(&mut self) -> Result<(), CameraError>;

    /// Start the media timeline at the given host timestamp.
    fn start_session(&mut self, host_timestamp_ns: i64);

    /// Append one buffer; `host_timestamp_ns` is on the host clock.
    fn append(&mut self, buffer: &SampleBuffer, host_timestamp_ns: i64) -> Result<(), CameraError>;

    fn pause(&mut self) -> Result<(), CameraError>;

    fn resume(&mut self) -> Result<(), CameraError>;

    /// Finalize the container.
    fn stop(&mut self) -> Result<(), CameraError>;

    /// Release all encoder resources. Called once, after `stop`.
    fn release(&mut self);
}
