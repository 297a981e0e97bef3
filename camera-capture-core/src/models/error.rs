use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while configuring or driving a camera session.
///
/// Every variant maps to a stable `"<domain>/<reason>"` code (see [`CameraError::code`])
/// which is what the bridge layer surfaces to the application.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CameraError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    CodeScanner(#[from] CodeScannerError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("recorder failed: {name} ({code})")]
    Recorder { name: String, code: i32 },

    #[error("unknown error: {message}")]
    Unknown {
        message: String,
        cause: Option<String>,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("no camera device was selected")]
    NoDevice,

    #[error("no camera device exists with the id \"{0}\"")]
    InvalidDevice(String),

    #[error("cameras are not available in this environment")]
    NotAvailableOnSimulator,

    #[error("no microphone is available")]
    MicrophoneUnavailable,

    #[error("the device does not support low-light boost")]
    LowLightBoostNotSupported,

    #[error("the device does not have a torch")]
    TorchUnavailable,

    #[error("the device does not have a flash")]
    FlashUnavailable,

    #[error("the device does not support focusing on a point")]
    FocusNotSupported,

    #[error("failed to lock the device for configuration: {0}")]
    ConfigurationFailed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("invalid value \"{received}\" for {union_name}")]
    InvalidValue { union_name: String, received: String },

    #[error("the session rejected the input \"{0}\"")]
    UnsupportedInput(String),

    #[error("the session rejected the output \"{0}\"")]
    UnsupportedOutput(String),

    #[error("invalid configuration: {0}")]
    InvalidCombination(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("the requested format is not supported by the device")]
    InvalidFormat,

    #[error("{0} fps is not supported by the active format")]
    InvalidFps(u32),

    #[error("video HDR is not supported by the active format")]
    InvalidHdr,

    #[error("pixel format \"{0}\" is not supported by the video output")]
    InvalidPixelFormat(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("the camera is not ready yet")]
    CameraNotReady,

    #[error("the session has been torn down")]
    Invalidated,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("microphone permission is not granted")]
    Microphone,

    #[error("camera permission is not granted")]
    Camera,

    #[error("location permission is not granted")]
    Location,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeScannerError {
    #[error("the code scanner output cannot be added alongside the current outputs")]
    NotCompatibleWithOutputs,

    #[error("code type \"{0}\" is not supported by the code scanner")]
    CodeTypeNotSupported(String),

    #[error("no code scanner is available")]
    ScannerUnavailable,

    #[error("scanning failed: {0}")]
    ScanFailed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("a recording is already in progress")]
    RecordingInProgress,

    #[error("no recording is in progress")]
    NoRecordingInProgress,

    #[error("cannot {operation} while the recording is {state}")]
    InvalidRecordingState { operation: String, state: String },

    #[error("the photo output is not enabled")]
    PhotoNotEnabled,

    #[error("the video output is not enabled")]
    VideoNotEnabled,

    #[error("file error: {0}")]
    FileError(String),

    #[error("the capture was aborted")]
    Aborted,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame released more often than it was retained")]
    OverReleased,

    #[error("frame has already been returned to the buffer pool")]
    Invalid,
}

/// The structured error event delivered through the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub code: String,
    pub message: String,
    pub cause: Option<String>,
}

impl CameraError {
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
            cause: None,
        }
    }

    /// The domain part of [`code`](Self::code).
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Device(_) => "device",
            Self::Parameter(_) => "parameter",
            Self::Format(_) => "format",
            Self::Session(_) => "session",
            Self::Permission(_) => "permission",
            Self::CodeScanner(_) => "code-scanner",
            Self::Capture(_) | Self::Recorder { .. } => "capture",
            Self::Frame(_) => "frame",
            Self::Unknown { .. } => "unknown",
        }
    }

    pub fn code(&self) -> String {
        let reason = match self {
            Self::Device(e) => match e {
                DeviceError::NoDevice => "no-device",
                DeviceError::InvalidDevice(_) => "invalid-device",
                DeviceError::NotAvailableOnSimulator => "camera-not-available-on-simulator",
                DeviceError::MicrophoneUnavailable => "microphone-unavailable",
                DeviceError::LowLightBoostNotSupported => "low-light-boost-not-supported",
                DeviceError::TorchUnavailable => "torch-unavailable",
                DeviceError::FlashUnavailable => "flash-unavailable",
                DeviceError::FocusNotSupported => "focus-not-supported",
                DeviceError::ConfigurationFailed(_) => "configuration-error",
            },
            Self::Parameter(e) => match e {
                ParameterError::InvalidValue { .. } => "invalid-parameter",
                ParameterError::UnsupportedInput(_) => "unsupported-input",
                ParameterError::UnsupportedOutput(_) => "unsupported-output",
                ParameterError::InvalidCombination(_) => "invalid-combination",
            },
            Self::Format(e) => match e {
                FormatError::InvalidFormat => "invalid-format",
                FormatError::InvalidFps(_) => "invalid-fps",
                FormatError::InvalidHdr => "invalid-hdr",
                FormatError::InvalidPixelFormat(_) => "invalid-pixel-format",
            },
            Self::Session(e) => match e {
                SessionError::CameraNotReady => "camera-not-ready",
                SessionError::Invalidated => "invalidated",
            },
            Self::Permission(e) => match e {
                PermissionError::Microphone => "microphone-permission-denied",
                PermissionError::Camera => "camera-permission-denied",
                PermissionError::Location => "location-permission-denied",
            },
            Self::CodeScanner(e) => match e {
                CodeScannerError::NotCompatibleWithOutputs => "not-compatible-with-outputs",
                CodeScannerError::CodeTypeNotSupported(_) => "code-type-not-supported",
                CodeScannerError::ScannerUnavailable => "scanner-unavailable",
                CodeScannerError::ScanFailed(_) => "scan-failed",
            },
            Self::Capture(e) => match e {
                CaptureError::RecordingInProgress => "recording-in-progress",
                CaptureError::NoRecordingInProgress => "no-recording-in-progress",
                CaptureError::InvalidRecordingState { .. } => "invalid-recording-state",
                CaptureError::PhotoNotEnabled => "photo-not-enabled",
                CaptureError::VideoNotEnabled => "video-not-enabled",
                CaptureError::FileError(_) => "file-io-error",
                CaptureError::Aborted => "aborted",
            },
            Self::Recorder { .. } => "recorder-error",
            Self::Frame(e) => match e {
                FrameError::OverReleased => "over-released",
                FrameError::Invalid => "invalid-frame",
            },
            Self::Unknown { .. } => "unknown",
        };
        format!("{}/{}", self.domain(), reason)
    }

    pub fn to_event(&self) -> ErrorEvent {
        let cause = match self {
            Self::Unknown { cause, .. } => cause.clone(),
            Self::Recorder { code, .. } => Some(format!("recorder error code {}", code)),
            _ => None,
        };
        ErrorEvent {
            code: self.code(),
            message: self.to_string(),
            cause,
        }
    }
}
