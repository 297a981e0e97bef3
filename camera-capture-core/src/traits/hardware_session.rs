use std::sync::Arc;

use crate::models::buffer::{SampleBuffer, SessionClock};
use crate::models::camera_types::{CodeType, MicrophoneInfo, Orientation, Rect};
use crate::models::error::CameraError;
use crate::models::format::{PixelFormat, VideoStabilizationMode};
use crate::models::photo::{CapturedPhoto, PhotoCaptureSettings};
use crate::traits::capture_device::CaptureDevice;

/// The hardware buffer pool a video buffer must be returned to.
pub trait BufferPool: Send + Sync {
    fn recycle(&self, buffer: SampleBuffer);
}

/// Callback invoked on the video queue for every captured video buffer.
pub type VideoBufferCallback = Arc<dyn Fn(SampleBuffer, Arc<dyn BufferPool>) + Send + Sync + 'static>;

/// Callback invoked on the audio queue for every captured audio buffer.
pub type AudioBufferCallback = Arc<dyn Fn(SampleBuffer) + Send + Sync + 'static>;

/// Callback for errors the hardware reports out-of-band.
pub type RuntimeErrorCallback = Arc<dyn Fn(CameraError) + Send + Sync + 'static>;

pub type SubscriptionId = u64;

pub enum SessionInput {
    Camera(Arc<dyn CaptureDevice>),
    Microphone(MicrophoneInfo),
}

impl SessionInput {
    pub fn descriptor(&self) -> &'static str {
        match self {
            Self::Camera(_) => "video-input",
            Self::Microphone(_) => "audio-input",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Preview,
    Photo,
    Video,
    Audio,
    CodeScanner,
}

impl OutputKind {
    pub fn descriptor(&self) -> &'static str {
        match self {
            Self::Preview => "preview-output",
            Self::Photo => "photo-output",
            Self::Video => "video-output",
            Self::Audio => "audio-output",
            Self::CodeScanner => "code-scanner-output",
        }
    }
}

pub enum SessionOutput {
    Preview,
    Photo,
    Video {
        on_buffer: VideoBufferCallback,
        always_discard_late_frames: bool,
    },
    Audio {
        on_buffer: AudioBufferCallback,
    },
    /// Streams its own buffers into `on_buffer` when set; otherwise the scanner
    /// is fed from the video output.
    CodeScanner {
        on_buffer: Option<VideoBufferCallback>,
    },
}

impl SessionOutput {
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::Preview => OutputKind::Preview,
            Self::Photo => OutputKind::Photo,
            Self::Video { .. } => OutputKind::Video,
            Self::Audio { .. } => OutputKind::Audio,
            Self::CodeScanner { .. } => OutputKind::CodeScanner,
        }
    }
}

/// What the attached photo output can deliver on the current device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhotoCapabilities {
    pub high_resolution_supported: bool,
    pub depth_data_supported: bool,
    pub portrait_effects_matte_supported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhotoOutputSettings {
    pub high_resolution: bool,
    pub depth_data: bool,
    pub portrait_effects_matte: bool,
    pub photo_hdr: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoOutputSettings {
    pub pixel_format: PixelFormat,
    pub enable_hdr: bool,
    pub enable_buffer_compression: bool,
}

/// Callbacks for one in-flight photo capture.
pub struct PhotoCaptureHandler {
    pub on_capture_started: Box<dyn FnOnce() + Send>,
    pub on_finished: Box<dyn FnOnce(Result<CapturedPhoto, CameraError>) + Send>,
}

/// A live hardware capture session (inputs + outputs).
///
/// Inputs and outputs are never mutated in place; they are removed and
/// re-added. Mutations must happen between `begin_configuration` and
/// `commit_configuration`.
pub trait HardwareSession: Send + Sync {
    fn begin_configuration(&self);

    fn commit_configuration(&self);

    fn remove_all_inputs(&self);

    fn can_add_input(&self, input: &SessionInput) -> bool;

    fn add_input(&self, input: SessionInput) -> Result<(), CameraError>;

    fn remove_all_outputs(&self);

    fn can_add_output(&self, kind: OutputKind) -> bool;

    fn add_output(&self, output: SessionOutput) -> Result<(), CameraError>;

    /// Only meaningful once a photo output is attached.
    fn photo_capabilities(&self) -> PhotoCapabilities;

    fn configure_photo_output(&self, settings: PhotoOutputSettings);

    /// Code types the attached code scanner output supports. Only known once
    /// the output is attached to the session.
    fn available_code_types(&self) -> Vec<CodeType>;

    fn set_code_scanner_filter(&self, code_types: &[CodeType], region_of_interest: Option<Rect>);

    /// Pixel formats the video output can stream for the active device format.
    fn supported_pixel_formats(&self) -> Vec<PixelFormat>;

    fn configure_video_output(&self, settings: VideoOutputSettings);

    /// Applied to every connection that supports stabilization.
    fn set_video_stabilization_mode(&self, mode: VideoStabilizationMode);

    fn set_output_orientation(&self, orientation: Orientation, mirrored: bool);

    fn start_running(&self);

    fn stop_running(&self);

    fn is_running(&self) -> bool;

    fn clock(&self) -> SessionClock;

    /// Capture a photo with the attached photo output.
    fn capture_photo(&self, settings: PhotoCaptureSettings, handler: PhotoCaptureHandler);

    fn subscribe_runtime_errors(&self, callback: RuntimeErrorCallback) -> SubscriptionId;

    fn unsubscribe_runtime_errors(&self, id: SubscriptionId);
}
