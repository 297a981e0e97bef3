use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::camera_types::{Flash, Orientation};

/// Geographic location embedded into photo metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

union_value! {
    pub enum QualityPrioritization as "qualityPrioritization" {
        Speed => "speed",
        Balanced => "balanced",
        Quality => "quality",
    }
}

impl Default for QualityPrioritization {
    fn default() -> Self {
        QualityPrioritization::Balanced
    }
}

/// Options passed to `take_photo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakePhotoOptions {
    pub flash: Flash,
    pub enable_shutter_sound: bool,
    pub quality_prioritization: QualityPrioritization,
    /// Directory to write the photo into; the cache directory if None.
    pub directory: Option<PathBuf>,
}

impl Default for TakePhotoOptions {
    fn default() -> Self {
        Self {
            flash: Flash::Off,
            enable_shutter_sound: true,
            quality_prioritization: QualityPrioritization::Balanced,
            directory: None,
        }
    }
}

/// Per-capture settings handed to the hardware photo output.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoCaptureSettings {
    pub flash: Flash,
    pub enable_shutter_sound: bool,
    pub quality_prioritization: QualityPrioritization,
    pub enable_depth_data: bool,
    pub enable_portrait_effects_matte: bool,
    pub location: Option<Location>,
}

/// Encoded image data produced by the hardware photo output.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub is_mirrored: bool,
    pub is_raw: bool,
    pub data: Vec<u8>,
}

/// A photo written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub is_mirrored: bool,
    pub is_raw_photo: bool,
    pub location: Option<Location>,
}
