use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::models::camera_types::{Flash, Point, ShutterType};
use crate::models::config::OutputConfiguration;
use crate::models::error::{CameraError, CaptureError, DeviceError, ParameterError};
use crate::models::photo::{CapturedPhoto, Location, Photo, PhotoCaptureSettings, TakePhotoOptions};
use crate::session::camera_session::{not_ready, CameraSession, SessionInner};
use crate::storage::metadata::write_photo_metadata;
use crate::storage::output_file::{create_output_file, write_file};
use crate::traits::hardware_session::{OutputKind, PhotoCaptureHandler};

/// Resolves once with the captured photo or the reason it failed.
///
/// Only the hardware can cancel a capture; dropping this future does not.
pub struct PhotoCapture {
    receiver: oneshot::Receiver<Result<Photo, CameraError>>,
}

impl Future for PhotoCapture {
    type Output = Result<Photo, CameraError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // the hardware dropped the capture without completing it
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(CaptureError::Aborted.into())),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl CameraSession {
    /// Captures a photo with the photo output. Runs on the camera queue.
    pub fn take_photo(&self, options: TakePhotoOptions) -> PhotoCapture {
        let (sender, receiver) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        self.inner.camera_queue.dispatch(move || {
            inner.capture_photo(options, sender);
        });
        PhotoCapture { receiver }
    }

    /// Focuses on `point`, given in normalized `[0, 1]` coordinates.
    pub fn focus(&self, point: Point) -> Result<(), CameraError> {
        if !(0.0..=1.0).contains(&point.x) || !(0.0..=1.0).contains(&point.y) {
            return Err(ParameterError::InvalidValue {
                union_name: "point".to_string(),
                received: format!("{{ x: {}, y: {} }}", point.x, point.y),
            }
            .into());
        }
        let device = self.inner.current_device().ok_or_else(not_ready)?;
        if !device.is_focus_point_supported() {
            return Err(DeviceError::FocusNotSupported.into());
        }
        let lock = self.inner.lock_device()?;
        lock.device().set_focus_point(point);
        Ok(())
    }
}

impl SessionInner {
    fn capture_photo(&self, options: TakePhotoOptions, sender: oneshot::Sender<Result<Photo, CameraError>>) {
        let settings = match self.photo_settings(&options) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to take photo: {}", e);
                let _ = sender.send(Err(e));
                return;
            }
        };
        log::info!("Capturing photo...");

        let delegate = Arc::clone(&self.delegate);
        let directory = options.directory.clone();
        let location = settings.location;
        let handler = PhotoCaptureHandler {
            on_capture_started: Box::new(move || delegate.on_shutter(ShutterType::Photo)),
            on_finished: Box::new(move |result| {
                let photo = result.and_then(|captured| save_photo(captured, directory, location));
                if let Err(e) = &photo {
                    log::error!("Photo capture failed: {}", e);
                }
                let _ = sender.send(photo);
            }),
        };
        self.video_session.capture_photo(settings, handler);
    }

    fn photo_settings(&self, options: &TakePhotoOptions) -> Result<PhotoCaptureSettings, CameraError> {
        let config = self.current_configuration().ok_or_else(not_ready)?;
        let OutputConfiguration::Enabled(photo) = &config.photo else {
            return Err(CaptureError::PhotoNotEnabled.into());
        };
        if !self.has_output(OutputKind::Photo) {
            return Err(CaptureError::PhotoNotEnabled.into());
        }
        let device = self.current_device().ok_or_else(not_ready)?;
        if options.flash != Flash::Off && !device.has_flash() {
            return Err(DeviceError::FlashUnavailable.into());
        }

        let capabilities = self.video_session.photo_capabilities();
        let location = if config.enable_location {
            self.hardware.last_known_location()
        } else {
            None
        };
        Ok(PhotoCaptureSettings {
            flash: options.flash,
            enable_shutter_sound: options.enable_shutter_sound,
            quality_prioritization: options.quality_prioritization,
            enable_depth_data: photo.enable_depth_data && capabilities.depth_data_supported,
            enable_portrait_effects_matte: photo.enable_portrait_effects_matte
                && capabilities.portrait_effects_matte_supported,
            location,
        })
    }
}

fn save_photo(captured: CapturedPhoto, directory: Option<PathBuf>, location: Option<Location>) -> Result<Photo, CameraError> {
    let extension = if captured.is_raw { "dng" } else { "jpg" };
    let path = create_output_file(directory.as_deref(), "IMG", extension)?;
    write_file(&path, &captured.data)?;

    let photo = Photo {
        path,
        width: captured.width,
        height: captured.height,
        orientation: captured.orientation,
        is_mirrored: captured.is_mirrored,
        is_raw_photo: captured.is_raw,
        location,
    };
    write_photo_metadata(&photo)?;
    Ok(photo)
}
