use std::sync::{Arc, Weak};

use crate::models::camera_types::{DevicePosition, Torch};
use crate::models::config::{CameraConfiguration, OutputConfiguration};
use crate::models::difference::Difference;
use crate::models::error::{CameraError, CodeScannerError, DeviceError, FormatError, ParameterError};
use crate::models::format::{DeviceFormat, PixelFormat};
use crate::models::state::RunState;
use crate::processing::code_scanner_pipeline::CodeScannerPipeline;
use crate::processing::frame_dispatcher::{FrameDispatcher, VideoSource};
use crate::session::camera_session::{not_ready, SessionInner};
use crate::session::locks::{DeviceConfigurationGuard, SessionConfigurationGuard};
use crate::traits::capture_device::CaptureDevice;
use crate::traits::hardware_session::{
    HardwareSession, OutputKind, PhotoOutputSettings, SessionInput, SessionOutput, VideoBufferCallback,
    VideoOutputSettings,
};

impl SessionInner {
    /// Converges the video session towards `config`. Runs on the camera queue.
    ///
    /// The first failing step aborts the remaining steps; whatever was applied
    /// before it stays applied.
    pub(crate) fn apply_configuration(&self, config: &CameraConfiguration, difference: &Difference) {
        let mut transition = None;
        if let Err(e) = self.reconcile(config, difference, &mut transition) {
            self.report(&e);
        }
        match transition {
            Some(RunState::Running) => self.delegate.on_started(),
            Some(RunState::Stopped) => self.delegate.on_stopped(),
            None => {}
        }
    }

    fn reconcile(
        &self,
        config: &CameraConfiguration,
        difference: &Difference,
        transition: &mut Option<RunState>,
    ) -> Result<(), CameraError> {
        if difference.is_session_configuration_dirty() {
            let _lock = SessionConfigurationGuard::begin(self.video_session.as_ref());
            if difference.input_changed {
                self.configure_device(config)?;
            }
            if difference.outputs_changed {
                self.configure_outputs(config)?;
            }
            if difference.video_stabilization_changed {
                self.configure_video_stabilization(config);
            }
            if difference.orientation_changed {
                self.configure_orientation(config);
            }
        }

        if difference.is_device_configuration_dirty() {
            let lock = self.lock_device()?;
            let device = lock.device();
            if difference.format_changed {
                configure_format(config, device)?;
            }
            // supported pixel formats depend on the active format
            if difference.outputs_changed || difference.format_changed {
                self.configure_pixel_format(config, device)?;
                check_photo_hdr(config, device)?;
            }
            if difference.side_props_changed {
                configure_side_props(config, device)?;
            }
            if difference.zoom_changed {
                configure_zoom(config, device);
            }
            if difference.exposure_changed {
                configure_exposure(config, device);
            }
        }

        *transition = self.lifecycle.reconcile(self.video_session.as_ref(), config.is_active);

        // the torch only works on a running session
        if difference.torch_changed {
            let lock = self.lock_device()?;
            configure_torch(config, lock.device())?;
        }

        if difference.input_changed {
            self.delegate.on_initialized();
        }
        Ok(())
    }

    pub(crate) fn lock_device(&self) -> Result<DeviceConfigurationGuard, CameraError> {
        let device = self.current_device().ok_or_else(not_ready)?;
        DeviceConfigurationGuard::lock(device)
    }

    fn configure_device(&self, config: &CameraConfiguration) -> Result<(), CameraError> {
        log::info!("Configuring input device...");
        self.video_session.remove_all_inputs();
        self.attached.lock().device = None;

        if !self.hardware.is_available() {
            return Err(DeviceError::NotAvailableOnSimulator.into());
        }
        let camera_id = config.camera_id.as_deref().ok_or(DeviceError::NoDevice)?;

        log::info!("Configuring camera {}...", camera_id);
        let device = self
            .hardware
            .device(camera_id)
            .ok_or_else(|| DeviceError::InvalidDevice(camera_id.to_string()))?;
        let input = SessionInput::Camera(Arc::clone(&device));
        if !self.video_session.can_add_input(&input) {
            return Err(ParameterError::UnsupportedInput(input.descriptor().to_string()).into());
        }
        self.video_session.add_input(input)?;
        self.attached.lock().device = Some(device);

        log::info!("Successfully configured input device");
        Ok(())
    }

    fn configure_outputs(&self, config: &CameraConfiguration) -> Result<(), CameraError> {
        log::info!("Configuring outputs...");
        self.video_session.remove_all_outputs();
        self.attached.lock().outputs.clear();
        self.dispatcher.set_preview(None);
        self.dispatcher.set_code_scanner(None);

        if config.preview.is_enabled() {
            log::info!("Adding preview output...");
            self.add_output(SessionOutput::Preview)?;
            self.dispatcher.set_preview(self.preview_target.read().clone());
        }

        if let OutputConfiguration::Enabled(photo) = &config.photo {
            log::info!("Adding photo output...");
            self.add_output(SessionOutput::Photo)?;
            let capabilities = self.video_session.photo_capabilities();
            self.video_session.configure_photo_output(PhotoOutputSettings {
                high_resolution: photo.enable_high_quality_photos && capabilities.high_resolution_supported,
                depth_data: photo.enable_depth_data && capabilities.depth_data_supported,
                portrait_effects_matte: photo.enable_portrait_effects_matte
                    && capabilities.portrait_effects_matte_supported,
                photo_hdr: photo.photo_hdr,
            });
        }

        if config.video.is_enabled() {
            log::info!("Adding video data output...");
            self.add_output(SessionOutput::Video {
                on_buffer: self.video_buffer_callback(VideoSource::Video),
                always_discard_late_frames: true,
            })?;
        }

        if let OutputConfiguration::Enabled(scanner) = &config.code_scanner {
            log::info!("Adding code scanner output...");
            if !self.video_session.can_add_output(OutputKind::CodeScanner) {
                return Err(CodeScannerError::NotCompatibleWithOutputs.into());
            }
            // without a video output the scanner output streams on its own
            let on_buffer = (!config.video.is_enabled()).then(|| self.video_buffer_callback(VideoSource::CodeScanner));
            self.video_session.add_output(SessionOutput::CodeScanner { on_buffer })?;
            self.attached.lock().outputs.push(OutputKind::CodeScanner);

            // only known once the output is attached
            let available = self.video_session.available_code_types();
            if let Some(unsupported) = scanner.code_types.iter().find(|t| !available.contains(t)) {
                return Err(CodeScannerError::CodeTypeNotSupported(unsupported.to_string()).into());
            }
            self.video_session
                .set_code_scanner_filter(&scanner.code_types, scanner.region_of_interest);

            let decoder = self
                .hardware
                .barcode_scanner()
                .ok_or(CodeScannerError::ScannerUnavailable)?;
            self.dispatcher.set_code_scanner(Some(Arc::new(CodeScannerPipeline::new(
                decoder,
                scanner.code_types.clone(),
                Arc::clone(&self.delegate),
            ))));
        }

        log::info!("Successfully configured all outputs");
        Ok(())
    }

    fn add_output(&self, output: SessionOutput) -> Result<(), CameraError> {
        let kind = output.kind();
        if !self.video_session.can_add_output(kind) {
            return Err(ParameterError::UnsupportedOutput(kind.descriptor().to_string()).into());
        }
        self.video_session.add_output(output)?;
        self.attached.lock().outputs.push(kind);
        Ok(())
    }

    fn video_buffer_callback(&self, source: VideoSource) -> VideoBufferCallback {
        let dispatcher: Arc<FrameDispatcher> = Arc::clone(&self.dispatcher);
        let session: Weak<dyn HardwareSession> = Arc::downgrade(&self.video_session);
        Arc::new(move |buffer, pool| {
            let clock = session.upgrade().map(|s| s.clock()).unwrap_or_default();
            dispatcher.dispatch_video(buffer, pool, clock, source);
        })
    }

    fn configure_video_stabilization(&self, config: &CameraConfiguration) {
        log::info!("Configuring video stabilization ({})...", config.video_stabilization_mode);
        self.video_session
            .set_video_stabilization_mode(config.video_stabilization_mode);
    }

    fn configure_orientation(&self, config: &CameraConfiguration) {
        let is_mirrored = self
            .current_device()
            .map(|device| device.position() == DevicePosition::Front)
            .unwrap_or(false);
        log::info!("Configuring orientation ({}, mirrored: {})...", config.orientation, is_mirrored);
        self.video_session
            .set_output_orientation(config.orientation, is_mirrored);
    }

    fn configure_pixel_format(&self, config: &CameraConfiguration, device: &dyn CaptureDevice) -> Result<(), CameraError> {
        let OutputConfiguration::Enabled(video) = &config.video else {
            return Ok(());
        };
        if !self.has_output(OutputKind::Video) {
            return Ok(());
        }

        if video.enable_hdr && !device.active_format().supports_video_hdr {
            return Err(FormatError::InvalidHdr.into());
        }
        let supported = self.video_session.supported_pixel_formats();
        let pixel_format = select_pixel_format(video.pixel_format, &supported)?;
        log::info!("Configuring pixel format {}...", pixel_format);
        self.video_session.configure_video_output(VideoOutputSettings {
            pixel_format,
            enable_hdr: video.enable_hdr,
            enable_buffer_compression: video.enable_buffer_compression,
        });
        Ok(())
    }
}

/// `Native` picks whatever the output streams first; anything else must be
/// supported as-is.
fn select_pixel_format(requested: PixelFormat, supported: &[PixelFormat]) -> Result<PixelFormat, CameraError> {
    let selected = match requested {
        PixelFormat::Native => supported.first().copied(),
        other => supported.contains(&other).then_some(other),
    };
    selected.ok_or_else(|| FormatError::InvalidPixelFormat(requested.to_string()).into())
}

fn check_photo_hdr(config: &CameraConfiguration, device: &dyn CaptureDevice) -> Result<(), CameraError> {
    match &config.photo {
        OutputConfiguration::Enabled(photo) if photo.photo_hdr && !device.active_format().supports_photo_hdr => {
            Err(FormatError::InvalidHdr.into())
        }
        _ => Ok(()),
    }
}

fn configure_format(config: &CameraConfiguration, device: &dyn CaptureDevice) -> Result<(), CameraError> {
    let Some(target) = &config.format else {
        return Ok(());
    };
    log::info!("Configuring format ({}x{})...", target.video_size.width, target.video_size.height);

    if device.active_format().matches(target) {
        log::info!("Already selected active format");
        return Ok(());
    }
    let format = device
        .formats()
        .into_iter()
        .find(|format| format.matches(target))
        .ok_or(FormatError::InvalidFormat)?;
    device.set_active_format(&format);

    log::info!("Successfully configured format");
    Ok(())
}

fn configure_side_props(config: &CameraConfiguration, device: &dyn CaptureDevice) -> Result<(), CameraError> {
    match config.fps {
        Some(fps) => {
            if !device.active_format().supports_fps(f64::from(fps)) {
                return Err(FormatError::InvalidFps(fps).into());
            }
            log::info!("Configuring fixed frame rate of {} fps...", fps);
            device.set_fixed_fps(Some(fps));
        }
        None => device.set_fixed_fps(None),
    }

    if device.is_low_light_boost_enabled() != config.enable_low_light_boost {
        if !device.is_low_light_boost_supported() {
            return Err(DeviceError::LowLightBoostNotSupported.into());
        }
        device.set_low_light_boost_enabled(config.enable_low_light_boost);
    }
    Ok(())
}

fn configure_zoom(config: &CameraConfiguration, device: &dyn CaptureDevice) {
    let Some(zoom) = config.zoom else {
        return;
    };
    let format = device.active_format();
    device.set_zoom(clamp_zoom(zoom, &format));
}

fn configure_exposure(config: &CameraConfiguration, device: &dyn CaptureDevice) {
    let Some(exposure) = config.exposure else {
        return;
    };
    let format = device.active_format();
    device.set_exposure_bias(clamp_exposure(exposure, &format));
}

fn configure_torch(config: &CameraConfiguration, device: &dyn CaptureDevice) -> Result<(), CameraError> {
    if device.torch() == config.torch {
        return Ok(());
    }
    if !device.has_torch() {
        return Err(DeviceError::TorchUnavailable.into());
    }
    let level = match config.torch {
        Torch::On => 1.0,
        Torch::Off => 0.0,
    };
    log::info!("Turning torch {}...", config.torch);
    device.set_torch(config.torch, level)
}

pub(crate) fn clamp_zoom(zoom: f64, format: &DeviceFormat) -> f64 {
    zoom.min(format.max_zoom).max(format.min_zoom)
}

pub(crate) fn clamp_exposure(exposure: f64, format: &DeviceFormat) -> f64 {
    exposure.max(format.min_exposure_bias).min(format.max_exposure_bias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::format::{FrameRateRange, Size};
    use approx::assert_relative_eq;

    fn format() -> DeviceFormat {
        DeviceFormat {
            photo_size: Size::new(4032, 3024),
            video_size: Size::new(1920, 1080),
            frame_rate_ranges: vec![FrameRateRange::new(24.0, 30.0)],
            supports_video_hdr: false,
            supports_photo_hdr: false,
            video_stabilization_modes: vec![],
            min_zoom: 1.0,
            max_zoom: 8.0,
            min_exposure_bias: -8.0,
            max_exposure_bias: 8.0,
        }
    }

    #[test]
    fn zoom_is_clamped_not_rejected() {
        let format = format();
        assert_relative_eq!(clamp_zoom(999.0, &format), 8.0);
        assert_relative_eq!(clamp_zoom(0.01, &format), 1.0);
        assert_relative_eq!(clamp_zoom(2.5, &format), 2.5);
    }

    #[test]
    fn exposure_is_clamped_not_rejected() {
        let format = format();
        assert_relative_eq!(clamp_exposure(-100.0, &format), -8.0);
        assert_relative_eq!(clamp_exposure(100.0, &format), 8.0);
        assert_relative_eq!(clamp_exposure(0.5, &format), 0.5);
    }

    #[test]
    fn native_pixel_format_takes_first_supported() {
        let supported = [PixelFormat::Yuv, PixelFormat::Rgb];
        assert_eq!(select_pixel_format(PixelFormat::Native, &supported).unwrap(), PixelFormat::Yuv);
        assert_eq!(select_pixel_format(PixelFormat::Rgb, &supported).unwrap(), PixelFormat::Rgb);

        let err = select_pixel_format(PixelFormat::Rgb, &[PixelFormat::Yuv]).unwrap_err();
        assert_eq!(err.code(), "format/invalid-pixel-format");
        assert!(select_pixel_format(PixelFormat::Native, &[]).is_err());
    }
}
