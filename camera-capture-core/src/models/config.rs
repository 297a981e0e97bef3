use serde::{Deserialize, Serialize};

use super::camera_types::{CodeType, Orientation, Rect, Torch};
use super::error::{CameraError, ParameterError};
use super::format::{FormatDescriptor, PixelFormat, Size, VideoStabilizationMode};

/// Enablement state of one output, carrying its options when enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "options")]
pub enum OutputConfiguration<T> {
    Disabled,
    Enabled(T),
}

impl<T> OutputConfiguration<T> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    pub fn options(&self) -> Option<&T> {
        match self {
            Self::Enabled(options) => Some(options),
            Self::Disabled => None,
        }
    }
}

impl<T> Default for OutputConfiguration<T> {
    fn default() -> Self {
        Self::Disabled
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhotoOutputOptions {
    pub target_size: Option<Size>,
    pub enable_high_quality_photos: bool,
    pub enable_depth_data: bool,
    pub enable_portrait_effects_matte: bool,
    pub photo_hdr: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoOutputOptions {
    pub target_size: Option<Size>,
    pub pixel_format: PixelFormat,
    pub enable_hdr: bool,
    pub enable_buffer_compression: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeScannerOptions {
    pub code_types: Vec<CodeType>,
    pub region_of_interest: Option<Rect>,
}

/// Immutable snapshot of every desired camera setting.
///
/// A configuration is never edited in place once it is active; the session
/// clones it into a draft, lets the caller edit the draft and swaps the whole
/// snapshot in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraConfiguration {
    /// Stable identifier of the camera device, or None if none is selected.
    pub camera_id: Option<String>,

    pub preview: OutputConfiguration<()>,
    pub photo: OutputConfiguration<PhotoOutputOptions>,
    pub video: OutputConfiguration<VideoOutputOptions>,
    pub code_scanner: OutputConfiguration<CodeScannerOptions>,

    /// Target format, or None to keep whatever the device has active.
    pub format: Option<FormatDescriptor>,

    /// Fixed frame rate, or None for automatic frame durations.
    pub fps: Option<u32>,
    pub enable_low_light_boost: bool,
    pub torch: Torch,

    /// Zoom factor; clamped into the active format's range when applied.
    pub zoom: Option<f64>,

    /// Exposure bias; clamped into the active format's range when applied.
    pub exposure: Option<f64>,
    pub video_stabilization_mode: VideoStabilizationMode,
    pub orientation: Orientation,

    pub audio: OutputConfiguration<()>,

    /// Embed the last known location into captured photos.
    pub enable_location: bool,

    /// Whether the hardware session should be running.
    pub is_active: bool,
}

impl CameraConfiguration {
    pub fn validate(&self) -> Result<(), CameraError> {
        if let Some(camera_id) = &self.camera_id {
            if camera_id.is_empty() {
                return Err(invalid("cameraId", camera_id));
            }
        }
        if self.fps == Some(0) {
            return Err(invalid("fps", "0"));
        }
        if let Some(zoom) = self.zoom {
            if !zoom.is_finite() || zoom <= 0.0 {
                return Err(invalid("zoom", &zoom.to_string()));
            }
        }
        if let Some(exposure) = self.exposure {
            if !exposure.is_finite() {
                return Err(invalid("exposure", &exposure.to_string()));
            }
        }
        if let OutputConfiguration::Enabled(scanner) = &self.code_scanner {
            if scanner.code_types.is_empty() {
                return Err(ParameterError::InvalidCombination(
                    "the code scanner needs at least one code type".into(),
                )
                .into());
            }
        }
        Ok(())
    }
}

fn invalid(union_name: &str, received: &str) -> CameraError {
    ParameterError::InvalidValue {
        union_name: union_name.to_string(),
        received: received.to_string(),
    }
    .into()
}
