use std::sync::Arc;

use parking_lot::Mutex;

use camera_capture_core::models::camera_types::{DeviceDescription, DevicePosition, Point, Torch};
use camera_capture_core::models::error::{CameraError, DeviceError};
use camera_capture_core::models::format::{DeviceFormat, FrameRateRange, Size, VideoStabilizationMode};
use camera_capture_core::traits::capture_device::CaptureDevice;

use crate::error::VirtualCameraError;
use crate::hardware_log::HardwareLog;

/// Static description of a virtual camera.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSpec {
    pub id: String,
    pub name: String,
    pub position: DevicePosition,
    pub formats: Vec<DeviceFormat>,
    pub has_torch: bool,
    pub has_flash: bool,
    pub supports_low_light_boost: bool,
    pub supports_focus_point: bool,
}

impl DeviceSpec {
    /// A back wide-angle camera with torch and flash.
    ///
    /// Formats: 1080p at 24-30 fps (zoom 1-8) and 4K at 1-60 fps with video HDR.
    pub fn back_wide() -> Self {
        Self {
            id: "back-wide".into(),
            name: "Back Wide Camera".into(),
            position: DevicePosition::Back,
            formats: vec![hd_format(), uhd_format()],
            has_torch: true,
            has_flash: true,
            supports_low_light_boost: true,
            supports_focus_point: true,
        }
    }

    /// A front camera without torch, flash, low-light boost or focus control.
    pub fn front() -> Self {
        Self {
            id: "front".into(),
            name: "Front Camera".into(),
            position: DevicePosition::Front,
            formats: vec![DeviceFormat {
                photo_size: Size::new(3088, 2316),
                video_size: Size::new(1280, 720),
                frame_rate_ranges: vec![FrameRateRange::new(15.0, 30.0)],
                supports_video_hdr: false,
                supports_photo_hdr: false,
                video_stabilization_modes: vec![VideoStabilizationMode::Off],
                min_zoom: 1.0,
                max_zoom: 4.0,
                min_exposure_bias: -4.0,
                max_exposure_bias: 4.0,
            }],
            has_torch: false,
            has_flash: false,
            supports_low_light_boost: false,
            supports_focus_point: false,
        }
    }

    pub fn description(&self) -> DeviceDescription {
        DeviceDescription {
            id: self.id.clone(),
            name: self.name.clone(),
            position: self.position,
        }
    }
}

/// 1920x1080, 24-30 fps, no HDR.
pub fn hd_format() -> DeviceFormat {
    DeviceFormat {
        photo_size: Size::new(4032, 3024),
        video_size: Size::new(1920, 1080),
        frame_rate_ranges: vec![FrameRateRange::new(24.0, 30.0)],
        supports_video_hdr: false,
        supports_photo_hdr: false,
        video_stabilization_modes: vec![VideoStabilizationMode::Off, VideoStabilizationMode::Standard],
        min_zoom: 1.0,
        max_zoom: 8.0,
        min_exposure_bias: -8.0,
        max_exposure_bias: 8.0,
    }
}

/// 3840x2160, 1-60 fps, video HDR.
pub fn uhd_format() -> DeviceFormat {
    DeviceFormat {
        photo_size: Size::new(4032, 3024),
        video_size: Size::new(3840, 2160),
        frame_rate_ranges: vec![FrameRateRange::new(1.0, 30.0), FrameRateRange::new(30.0, 60.0)],
        supports_video_hdr: true,
        supports_photo_hdr: true,
        video_stabilization_modes: vec![
            VideoStabilizationMode::Off,
            VideoStabilizationMode::Standard,
            VideoStabilizationMode::Cinematic,
        ],
        min_zoom: 1.0,
        max_zoom: 16.0,
        min_exposure_bias: -8.0,
        max_exposure_bias: 8.0,
    }
}

#[derive(Debug)]
struct DeviceState {
    active_format: DeviceFormat,
    fixed_fps: Option<u32>,
    low_light_boost: bool,
    torch: Torch,
    torch_level: f32,
    zoom: f64,
    exposure_bias: f64,
    focus_point: Option<Point>,
    lock_depth: u32,
    refuse_lock: bool,
    unlocked_mutations: u32,
}

/// A [`CaptureDevice`] backed by a [`DeviceSpec`] and in-memory state.
///
/// Every mutation is recorded in the shared [`HardwareLog`] as
/// `"<id>.<property>=<value>"`. Mutations made without holding the
/// configuration lock are counted (see [`unlocked_mutations`](Self::unlocked_mutations)).
#[derive(Debug)]
pub struct VirtualDevice {
    spec: DeviceSpec,
    log: Arc<HardwareLog>,
    state: Mutex<DeviceState>,
}

impl VirtualDevice {
    pub fn new(spec: DeviceSpec, log: Arc<HardwareLog>) -> Result<Self, VirtualCameraError> {
        let active_format = spec
            .formats
            .first()
            .cloned()
            .ok_or_else(|| VirtualCameraError::NoFormats(spec.id.clone()))?;
        let zoom = active_format.min_zoom;
        Ok(Self {
            spec,
            log,
            state: Mutex::new(DeviceState {
                active_format,
                fixed_fps: None,
                low_light_boost: false,
                torch: Torch::Off,
                torch_level: 0.0,
                zoom,
                exposure_bias: 0.0,
                focus_point: None,
                lock_depth: 0,
                refuse_lock: false,
                unlocked_mutations: 0,
            }),
        })
    }

    pub fn spec(&self) -> &DeviceSpec {
        &self.spec
    }

    /// Makes `lock_for_configuration` fail from now on.
    pub fn set_refuse_lock(&self, refuse: bool) {
        self.state.lock().refuse_lock = refuse;
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().lock_depth > 0
    }

    pub fn unlocked_mutations(&self) -> u32 {
        self.state.lock().unlocked_mutations
    }

    pub fn torch_level(&self) -> f32 {
        self.state.lock().torch_level
    }

    pub fn focus_point(&self) -> Option<Point> {
        self.state.lock().focus_point
    }

    fn mutate(&self, property: &str, value: String, apply: impl FnOnce(&mut DeviceState)) {
        let mut state = self.state.lock();
        if state.lock_depth == 0 {
            log::warn!("{}.{} changed without holding the configuration lock", self.spec.id, property);
            state.unlocked_mutations += 1;
        }
        apply(&mut state);
        drop(state);
        self.log.record(format!("{}.{}={}", self.spec.id, property, value));
    }
}

impl CaptureDevice for VirtualDevice {
    fn id(&self) -> String {
        self.spec.id.clone()
    }

    fn position(&self) -> DevicePosition {
        self.spec.position
    }

    fn lock_for_configuration(&self) -> Result<(), CameraError> {
        let mut state = self.state.lock();
        if state.refuse_lock {
            return Err(VirtualCameraError::LockRefused(self.spec.id.clone()).into());
        }
        state.lock_depth += 1;
        drop(state);
        self.log.record(format!("{}.lock", self.spec.id));
        Ok(())
    }

    fn unlock_for_configuration(&self) {
        let mut state = self.state.lock();
        state.lock_depth = state.lock_depth.saturating_sub(1);
        drop(state);
        self.log.record(format!("{}.unlock", self.spec.id));
    }

    fn formats(&self) -> Vec<DeviceFormat> {
        self.spec.formats.clone()
    }

    fn active_format(&self) -> DeviceFormat {
        self.state.lock().active_format.clone()
    }

    fn set_active_format(&self, format: &DeviceFormat) {
        let value = format!("{}x{}", format.video_size.width, format.video_size.height);
        let format = format.clone();
        self.mutate("format", value, move |state| {
            state.zoom = state.zoom.clamp(format.min_zoom, format.max_zoom);
            state.active_format = format;
        });
    }

    fn fixed_fps(&self) -> Option<u32> {
        self.state.lock().fixed_fps
    }

    fn set_fixed_fps(&self, fps: Option<u32>) {
        let value = fps.map(|f| f.to_string()).unwrap_or_else(|| "auto".into());
        self.mutate("fps", value, |state| state.fixed_fps = fps);
    }

    fn is_low_light_boost_supported(&self) -> bool {
        self.spec.supports_low_light_boost
    }

    fn is_low_light_boost_enabled(&self) -> bool {
        self.state.lock().low_light_boost
    }

    fn set_low_light_boost_enabled(&self, enabled: bool) {
        self.mutate("low-light-boost", enabled.to_string(), |state| state.low_light_boost = enabled);
    }

    fn has_torch(&self) -> bool {
        self.spec.has_torch
    }

    fn has_flash(&self) -> bool {
        self.spec.has_flash
    }

    fn torch(&self) -> Torch {
        self.state.lock().torch
    }

    fn set_torch(&self, torch: Torch, level: f32) -> Result<(), CameraError> {
        if !self.spec.has_torch {
            return Err(DeviceError::TorchUnavailable.into());
        }
        self.mutate("torch", torch.to_string(), |state| {
            state.torch = torch;
            state.torch_level = level;
        });
        Ok(())
    }

    fn zoom(&self) -> f64 {
        self.state.lock().zoom
    }

    fn set_zoom(&self, zoom: f64) {
        self.mutate("zoom", zoom.to_string(), |state| state.zoom = zoom);
    }

    fn exposure_bias(&self) -> f64 {
        self.state.lock().exposure_bias
    }

    fn set_exposure_bias(&self, bias: f64) {
        self.mutate("exposure", bias.to_string(), |state| state.exposure_bias = bias);
    }

    fn is_focus_point_supported(&self) -> bool {
        self.spec.supports_focus_point
    }

    fn set_focus_point(&self, point: Point) {
        let value = format!("{},{}", point.x, point.y);
        self.mutate("focus", value, |state| state.focus_point = Some(point));
    }
}
