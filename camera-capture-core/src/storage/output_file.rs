use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::{CameraError, CaptureError};

/// Directory captures land in when the caller does not pick one: the user
/// cache directory, or the OS temp dir when there is none.
pub fn default_directory() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(std::env::temp_dir)
}

/// Reserves a fresh, uniquely named file path for a capture.
///
/// Creates `directory` if needed; the file itself is written by the caller.
pub fn create_output_file(directory: Option<&Path>, prefix: &str, extension: &str) -> Result<PathBuf, CameraError> {
    let directory = directory.map(Path::to_path_buf).unwrap_or_else(default_directory);
    fs::create_dir_all(&directory)
        .map_err(|e| CaptureError::FileError(format!("failed to create {}: {}", directory.display(), e)))?;
    let file_name = format!("{}_{}.{}", prefix, uuid::Uuid::new_v4(), extension);
    Ok(directory.join(file_name))
}

/// Writes `data` to `path` in one go.
pub fn write_file(path: &Path, data: &[u8]) -> Result<(), CameraError> {
    fs::write(path, data)
        .map_err(|e| CaptureError::FileError(format!("failed to write {}: {}", path.display(), e)))?;
    Ok(())
}
