use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::buffer::{MediaType, SampleBuffer, SessionClock};
use crate::models::error::{CameraError, CaptureError};
use crate::models::recording::{RecorderSettings, Video};
use crate::models::state::RecordingState;
use crate::traits::clock::Clock;
use crate::traits::media_recorder::{
    MediaRecorder, RecorderErrorCallback, RECORDER_ERROR_SERVER_DIED, RECORDER_ERROR_UNKNOWN,
};

/// Fired exactly once with the finished video.
pub type RecordingFinishedCallback = Box<dyn FnOnce(Video) + Send + 'static>;

/// Fired for failures that happen after `start`.
pub type RecordingErrorCallback = Arc<dyn Fn(CameraError) + Send + Sync + 'static>;

struct RecordingInner {
    state: RecordingState,
    recorder: Option<Box<dyn MediaRecorder>>,
    start_time_ms: Option<i64>,
    first_video_timestamp_ns: Option<i64>,
    on_finished: Option<RecordingFinishedCallback>,
    video_buffers: u64,
    audio_buffers: u64,
}

/// One video recording, from `start` to `stop`.
///
/// Owns the encoder/muxer sink for its whole lifetime. Every state
/// transition and every appended buffer goes through a single lock, so only
/// one operation is ever in flight.
pub struct RecordingSession {
    id: Uuid,
    settings: RecorderSettings,
    clock: Arc<dyn Clock>,
    on_error: RecordingErrorCallback,
    inner: Mutex<RecordingInner>,
}

impl RecordingSession {
    /// Creates the session and its recorder. `create_recorder` receives the
    /// listener the recorder must call for asynchronous failures.
    pub fn new<F>(
        settings: RecorderSettings,
        clock: Arc<dyn Clock>,
        on_finished: RecordingFinishedCallback,
        on_error: RecordingErrorCallback,
        create_recorder: F,
    ) -> Result<Arc<Self>, CameraError>
    where
        F: FnOnce(RecorderErrorCallback) -> Result<Box<dyn MediaRecorder>, CameraError>,
    {
        let slot: Arc<OnceLock<Weak<RecordingSession>>> = Arc::new(OnceLock::new());
        let listener_slot = Arc::clone(&slot);
        let listener: RecorderErrorCallback = Arc::new(move |what, extra| {
            if let Some(session) = listener_slot.get().and_then(Weak::upgrade) {
                session.handle_recorder_error(what, extra);
            }
        });

        let recorder = create_recorder(listener)?;
        let session = Arc::new(Self {
            id: Uuid::new_v4(),
            settings,
            clock,
            on_error,
            inner: Mutex::new(RecordingInner {
                state: RecordingState::Idle,
                recorder: Some(recorder),
                start_time_ms: None,
                first_video_timestamp_ns: None,
                on_finished: Some(on_finished),
                video_buffers: 0,
                audio_buffers: 0,
            }),
        });
        let _ = slot.set(Arc::downgrade(&session));
        log::info!("Created recording session {} for {}", session.id, session.settings.output_path.display());
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    pub fn state(&self) -> RecordingState {
        self.inner.lock().state
    }

    /// (video, audio) buffers handed to the recorder so far.
    pub fn appended_buffers(&self) -> (u64, u64) {
        let inner = self.inner.lock();
        (inner.video_buffers, inner.audio_buffers)
    }

    /// Prepares and starts the recorder. The start timestamp is taken here,
    /// not at the first buffer.
    pub fn start(&self) -> Result<(), CameraError> {
        let mut inner = self.inner.lock();
        if inner.state != RecordingState::Idle {
            return Err(invalid_state("start", inner.state));
        }
        log::info!("Starting recording session {}", self.id);

        let started = match inner.recorder.as_mut() {
            Some(recorder) => recorder.prepare().and_then(|_| recorder.start()),
            None => Err(CaptureError::NoRecordingInProgress.into()),
        };
        if let Err(e) = started {
            log::error!("Failed to start recorder: {}", e);
            if let Some(mut recorder) = inner.recorder.take() {
                recorder.release();
            }
            inner.state = RecordingState::Stopped;
            inner.on_finished = None;
            return Err(e);
        }

        inner.start_time_ms = Some(self.clock.now_millis());
        inner.state = RecordingState::Recording;
        Ok(())
    }

    /// Appends one buffer. `clock` is the clock `buffer`'s timestamp is on;
    /// audio must already be synchronized onto the video session's clock.
    ///
    /// Buffers are dropped while paused, and audio is dropped until the first
    /// video buffer has opened the stream.
    pub fn append_buffer(
        &self,
        buffer: &SampleBuffer,
        clock: SessionClock,
        media_type: MediaType,
    ) -> Result<(), CameraError> {
        let mut inner = self.inner.lock();
        if inner.state != RecordingState::Recording {
            return Ok(());
        }
        let host_timestamp = clock.to_host(buffer.timestamp_ns);

        match media_type {
            MediaType::Video => {
                if inner.first_video_timestamp_ns.is_none() {
                    inner.first_video_timestamp_ns = Some(host_timestamp);
                    if let Some(recorder) = inner.recorder.as_mut() {
                        recorder.start_session(host_timestamp);
                    }
                }
                inner.video_buffers += 1;
            }
            MediaType::Audio => {
                if inner.first_video_timestamp_ns.is_none() {
                    return Ok(());
                }
                inner.audio_buffers += 1;
            }
        }

        match inner.recorder.as_mut() {
            Some(recorder) => recorder.append(buffer, host_timestamp),
            None => Ok(()),
        }
    }

    pub fn pause(&self) -> Result<(), CameraError> {
        let mut inner = self.inner.lock();
        if inner.state != RecordingState::Recording {
            return Err(invalid_state("pause", inner.state));
        }
        log::info!("Pausing recording session {}", self.id);
        if let Some(recorder) = inner.recorder.as_mut() {
            recorder.pause()?;
        }
        inner.state = RecordingState::Paused;
        Ok(())
    }

    pub fn resume(&self) -> Result<(), CameraError> {
        let mut inner = self.inner.lock();
        if inner.state != RecordingState::Paused {
            return Err(invalid_state("resume", inner.state));
        }
        log::info!("Resuming recording session {}", self.id);
        if let Some(recorder) = inner.recorder.as_mut() {
            recorder.resume()?;
        }
        inner.state = RecordingState::Recording;
        Ok(())
    }

    /// Finalizes the file and fires the completion callback.
    ///
    /// A failing recorder stop is logged and the callback still fires.
    pub fn stop(&self) -> Result<Video, CameraError> {
        let (video, on_finished) = {
            let mut inner = self.inner.lock();
            if !inner.state.is_active() {
                return Err(CaptureError::NoRecordingInProgress.into());
            }
            log::info!("Stopping recording session {}", self.id);

            if let Some(mut recorder) = inner.recorder.take() {
                if let Err(e) = recorder.stop() {
                    log::error!("Failed to stop recorder: {}", e);
                }
                recorder.release();
            }

            let stop_time = self.clock.now_millis();
            let duration_ms = stop_time - inner.start_time_ms.unwrap_or(stop_time);
            inner.state = RecordingState::Stopped;

            let video = Video {
                path: self.settings.output_path.clone(),
                duration_ms,
            };
            (video, inner.on_finished.take())
        };

        if let Some(on_finished) = on_finished {
            on_finished(video.clone());
        }
        Ok(video)
    }

    fn handle_recorder_error(&self, what: i32, extra: i32) {
        log::error!("Recorder error {} ({})", what, extra);
        let name = match what {
            RECORDER_ERROR_UNKNOWN => "unknown",
            RECORDER_ERROR_SERVER_DIED => "server-died",
            _ => "unknown",
        };
        if let Err(e) = self.stop() {
            log::debug!("Recording was not active when the recorder failed: {}", e);
        }
        (self.on_error)(CameraError::Recorder {
            name: name.to_string(),
            code: extra,
        });
    }
}

fn invalid_state(operation: &str, state: RecordingState) -> CameraError {
    CaptureError::InvalidRecordingState {
        operation: operation.to_string(),
        state: state.as_str().to_string(),
    }
    .into()
}
