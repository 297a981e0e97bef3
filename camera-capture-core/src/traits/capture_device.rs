use crate::models::camera_types::{DevicePosition, Point, Torch};
use crate::models::error::CameraError;
use crate::models::format::DeviceFormat;

/// A single camera device (sensor or logical multi-camera).
///
/// Setters must only be called between `lock_for_configuration` and
/// `unlock_for_configuration`.
pub trait CaptureDevice: Send + Sync {
    fn id(&self) -> String;

    fn position(&self) -> DevicePosition;

    fn lock_for_configuration(&self) -> Result<(), CameraError>;

    fn unlock_for_configuration(&self);

    /// All formats the device supports.
    fn formats(&self) -> Vec<DeviceFormat>;

    fn active_format(&self) -> DeviceFormat;

    fn set_active_format(&self, format: &DeviceFormat);

    /// Fixed frame rate currently applied, None if frame durations are automatic.
    fn fixed_fps(&self) -> Option<u32>;

    /// Pin min and max frame duration to `1 / fps`, or restore automatic
    /// frame durations with None.
    fn set_fixed_fps(&self, fps: Option<u32>);

    fn is_low_light_boost_supported(&self) -> bool;

    fn is_low_light_boost_enabled(&self) -> bool;

    fn set_low_light_boost_enabled(&self, enabled: bool);

    fn has_torch(&self) -> bool;

    fn has_flash(&self) -> bool;

    fn torch(&self) -> Torch;

    /// Apply a torch mode; `level` is in `0.0..=1.0` and only meaningful for `On`.
    fn set_torch(&self, torch: Torch, level: f32) -> Result<(), CameraError>;

    fn zoom(&self) -> f64;

    fn set_zoom(&self, zoom: f64);

    fn exposure_bias(&self) -> f64;

    fn set_exposure_bias(&self, bias: f64);

    fn is_focus_point_supported(&self) -> bool;

    /// Focus (and meter exposure) on a normalized point of interest.
    fn set_focus_point(&self, point: Point);
}
