use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::camera_types::Orientation;
use super::format::Size;

union_value! {
    pub enum VideoCodec as "videoCodec" {
        H264 => "h264",
        H265 => "h265",
    }
}

impl Default for VideoCodec {
    fn default() -> Self {
        VideoCodec::H264
    }
}

union_value! {
    pub enum VideoFileType as "fileType" {
        Mov => "mov",
        Mp4 => "mp4",
    }
}

impl Default for VideoFileType {
    fn default() -> Self {
        VideoFileType::Mov
    }
}

impl VideoFileType {
    pub fn extension(&self) -> &'static str {
        match self {
            VideoFileType::Mov => "mov",
            VideoFileType::Mp4 => "mp4",
        }
    }
}

/// Options passed to `start_recording`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordVideoOptions {
    /// Directory to write the video into; the cache directory if None.
    pub directory: Option<PathBuf>,
    pub file_type: VideoFileType,
    pub video_codec: VideoCodec,
    /// Replaces the recommended bit rate (bits per second).
    pub video_bit_rate_override: Option<f64>,
    /// Scales the recommended (or overridden) bit rate.
    pub video_bit_rate_multiplier: Option<f64>,
}

/// Everything the recorder sink needs to set up encoding and muxing.
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderSettings {
    pub output_path: PathBuf,
    pub file_type: VideoFileType,
    pub codec: VideoCodec,
    pub size: Size,
    pub fps: Option<u32>,
    pub bit_rate: u32,
    pub enable_audio: bool,
    pub orientation: Orientation,
}

/// A finished recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub path: PathBuf,
    pub duration_ms: i64,
}

impl Video {
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}
