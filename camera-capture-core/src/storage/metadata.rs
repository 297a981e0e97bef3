use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::{CameraError, CaptureError};
use crate::models::photo::Photo;

fn metadata_path(photo_path: &Path) -> PathBuf {
    photo_path.with_extension("metadata.json")
}

/// Write photo metadata (dimensions, orientation, location) as a JSON sidecar.
///
/// Creates `{photo_path}.metadata.json` alongside the photo.
pub fn write_photo_metadata(photo: &Photo) -> Result<(), CameraError> {
    let json = serde_json::to_string_pretty(photo)
        .map_err(|e| CaptureError::FileError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(metadata_path(&photo.path), json)
        .map_err(|e| CaptureError::FileError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read photo metadata back from its JSON sidecar.
pub fn read_photo_metadata(photo_path: &Path) -> Result<Photo, CameraError> {
    let json = fs::read_to_string(metadata_path(photo_path))
        .map_err(|e| CaptureError::FileError(format!("failed to read metadata: {}", e)))?;
    let photo = serde_json::from_str(&json)
        .map_err(|e| CaptureError::FileError(format!("failed to parse metadata: {}", e)))?;
    Ok(photo)
}
