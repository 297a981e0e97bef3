use std::sync::Arc;

use crate::models::config::OutputConfiguration;
use crate::models::error::{CameraError, CaptureError};
use crate::models::recording::{RecordVideoOptions, RecorderSettings, Video};
use crate::processing::bit_rate::{recommended_bit_rate, resolve_bit_rate};
use crate::session::camera_session::{not_ready, CameraSession, SessionInner};
use crate::session::recording::{RecordingErrorCallback, RecordingSession};
use crate::storage::output_file::create_output_file;
use crate::traits::hardware_session::OutputKind;

impl CameraSession {
    /// Starts recording the video output (and audio, when enabled) to a file.
    ///
    /// `on_finished` fires exactly once when the recording stops, however it
    /// stops. Failures to start, and recorder failures while recording, go to
    /// `on_error`.
    pub fn start_recording<F, E>(&self, options: RecordVideoOptions, on_finished: F, on_error: E)
    where
        F: FnOnce(Video) + Send + 'static,
        E: Fn(CameraError) + Send + Sync + 'static,
    {
        let on_error: RecordingErrorCallback = Arc::new(on_error);
        if let Err(e) = self.try_start_recording(options, Box::new(on_finished), Arc::clone(&on_error)) {
            log::error!("Failed to start recording: {}", e);
            on_error(e);
        }
    }

    fn try_start_recording(
        &self,
        options: RecordVideoOptions,
        on_finished: Box<dyn FnOnce(Video) + Send>,
        on_error: RecordingErrorCallback,
    ) -> Result<(), CameraError> {
        let inner = &self.inner;
        let config = inner.current_configuration().ok_or_else(not_ready)?;
        let OutputConfiguration::Enabled(video) = &config.video else {
            return Err(CaptureError::VideoNotEnabled.into());
        };
        if !inner.has_output(OutputKind::Video) {
            return Err(CaptureError::VideoNotEnabled.into());
        }
        if inner.dispatcher.recording().is_some() {
            return Err(CaptureError::RecordingInProgress.into());
        }
        let device = inner.current_device().ok_or_else(not_ready)?;

        let size = video.target_size.unwrap_or(device.active_format().video_size);
        let recommended = recommended_bit_rate(size, config.fps, options.video_codec, video.enable_hdr);
        let bit_rate = resolve_bit_rate(
            recommended,
            options.video_bit_rate_override,
            options.video_bit_rate_multiplier,
        );
        let enable_audio = config.audio.is_enabled();
        let output_path = create_output_file(options.directory.as_deref(), "VID", options.file_type.extension())?;

        let settings = RecorderSettings {
            output_path,
            file_type: options.file_type,
            codec: options.video_codec,
            size,
            fps: config.fps,
            bit_rate,
            enable_audio,
            orientation: config.orientation,
        };
        log::info!(
            "Starting {}x{} {} recording at {} bps (audio: {})",
            size.width,
            size.height,
            settings.codec,
            bit_rate,
            enable_audio
        );

        if enable_audio {
            let audio = Arc::clone(inner);
            inner.audio_queue.dispatch(move || {
                log::info!("Starting audio session...");
                audio.audio_session.start_running();
            });
        }

        let weak = Arc::downgrade(inner);
        let finished: Box<dyn FnOnce(Video) + Send> = Box::new(move |video| {
            if let Some(inner) = weak.upgrade() {
                inner.finish_recording(enable_audio);
            }
            on_finished(video);
        });

        let hardware = Arc::clone(&inner.hardware);
        let recorder_settings = settings.clone();
        let recording = RecordingSession::new(
            settings,
            Arc::clone(&inner.clock),
            finished,
            on_error,
            move |listener| hardware.create_recorder(&recorder_settings, listener),
        );
        let recording = match recording.and_then(|r| r.start().map(|_| r)) {
            Ok(recording) => recording,
            Err(e) => {
                inner.finish_recording(enable_audio);
                return Err(e);
            }
        };
        inner.dispatcher.set_recording(Some(recording));
        Ok(())
    }

    pub fn pause_recording(&self) -> Result<(), CameraError> {
        self.active_recording()?.pause()
    }

    pub fn resume_recording(&self) -> Result<(), CameraError> {
        self.active_recording()?.resume()
    }

    /// Stops the active recording; the completion callback passed to
    /// [`start_recording`](Self::start_recording) receives the video.
    pub fn stop_recording(&self) -> Result<Video, CameraError> {
        self.active_recording()?.stop()
    }

    fn active_recording(&self) -> Result<Arc<RecordingSession>, CameraError> {
        self.inner
            .dispatcher
            .recording()
            .ok_or_else(|| CaptureError::NoRecordingInProgress.into())
    }
}

impl SessionInner {
    /// Detaches the finished recording and releases the microphone.
    fn finish_recording(self: &Arc<Self>, stop_audio: bool) {
        self.dispatcher.take_recording();
        if stop_audio {
            let audio = Arc::clone(self);
            self.audio_queue.dispatch(move || {
                log::info!("Stopping audio session...");
                audio.audio_session.stop_running();
            });
        }
    }
}
