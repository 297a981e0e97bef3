use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use camera_capture_core::models::buffer::{MediaType, SampleBuffer};
use camera_capture_core::models::error::CameraError;
use camera_capture_core::models::recording::RecorderSettings;
use camera_capture_core::traits::media_recorder::{MediaRecorder, RecorderErrorCallback};

use crate::error::VirtualCameraError;

/// Failure injection for recorders created from now on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecorderFailures {
    pub fail_prepare: bool,
    pub fail_stop: bool,
}

#[derive(Debug, Default)]
struct ProbeState {
    prepared: bool,
    started: bool,
    paused: bool,
    stopped: bool,
    released: bool,
    session_start_ns: Option<i64>,
    video_timestamps: Vec<i64>,
    audio_timestamps: Vec<i64>,
}

/// What a [`VirtualRecorder`] was asked to do, observable after the fact.
pub struct RecorderProbe {
    settings: RecorderSettings,
    on_error: RecorderErrorCallback,
    state: Mutex<ProbeState>,
}

impl RecorderProbe {
    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    pub fn is_started(&self) -> bool {
        self.state.lock().started
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().released
    }

    pub fn session_start(&self) -> Option<i64> {
        self.state.lock().session_start_ns
    }

    /// Host timestamps of appended video buffers.
    pub fn video_timestamps(&self) -> Vec<i64> {
        self.state.lock().video_timestamps.clone()
    }

    /// Host timestamps of appended audio buffers.
    pub fn audio_timestamps(&self) -> Vec<i64> {
        self.state.lock().audio_timestamps.clone()
    }

    /// Reports an asynchronous recorder failure, the way an encoder would.
    pub fn trigger_error(&self, what: i32, extra: i32) {
        (self.on_error)(what, extra);
    }
}

/// A [`MediaRecorder`] that writes raw buffer bytes to the output file.
pub struct VirtualRecorder {
    probe: Arc<RecorderProbe>,
    failures: RecorderFailures,
    file: Option<File>,
}

impl VirtualRecorder {
    pub fn new(settings: RecorderSettings, on_error: RecorderErrorCallback, failures: RecorderFailures) -> Self {
        Self {
            probe: Arc::new(RecorderProbe {
                settings,
                on_error,
                state: Mutex::new(ProbeState::default()),
            }),
            failures,
            file: None,
        }
    }

    pub fn probe(&self) -> Arc<RecorderProbe> {
        Arc::clone(&self.probe)
    }
}

impl MediaRecorder for VirtualRecorder {
    fn prepare(&mut self) -> Result<(), CameraError> {
        if self.failures.fail_prepare {
            return Err(VirtualCameraError::Recorder("encoder unavailable".into()).into());
        }
        let path = &self.probe.settings.output_path;
        let file = File::create(path)
            .map_err(|e| VirtualCameraError::Recorder(format!("failed to create {}: {}", path.display(), e)))?;
        self.file = Some(file);
        self.probe.state.lock().prepared = true;
        Ok(())
    }

    fn start(&mut self) -> Result<(), CameraError> {
        let mut state = self.probe.state.lock();
        if !state.prepared {
            return Err(VirtualCameraError::Recorder("start before prepare".into()).into());
        }
        state.started = true;
        Ok(())
    }

    fn start_session(&mut self, host_timestamp_ns: i64) {
        self.probe.state.lock().session_start_ns = Some(host_timestamp_ns);
    }

    fn append(&mut self, buffer: &SampleBuffer, host_timestamp_ns: i64) -> Result<(), CameraError> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(&buffer.data)
                .map_err(|e| VirtualCameraError::Recorder(format!("write failed: {}", e)))?;
        }
        let mut state = self.probe.state.lock();
        match buffer.media_type {
            MediaType::Video => state.video_timestamps.push(host_timestamp_ns),
            MediaType::Audio => state.audio_timestamps.push(host_timestamp_ns),
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), CameraError> {
        self.probe.state.lock().paused = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), CameraError> {
        self.probe.state.lock().paused = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CameraError> {
        if self.failures.fail_stop {
            return Err(VirtualCameraError::Recorder("muxer failed to finalize".into()).into());
        }
        if let Some(file) = self.file.as_mut() {
            file.flush()
                .map_err(|e| VirtualCameraError::Recorder(format!("flush failed: {}", e)))?;
        }
        self.probe.state.lock().stopped = true;
        Ok(())
    }

    fn release(&mut self) {
        self.file = None;
        self.probe.state.lock().released = true;
    }
}
