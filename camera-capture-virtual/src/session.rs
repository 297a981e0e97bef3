use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use camera_capture_core::models::buffer::{MediaType, SampleBuffer, SessionClock};
use camera_capture_core::models::camera_types::{CodeType, Orientation, Rect};
use camera_capture_core::models::error::{CameraError, CaptureError, ParameterError};
use camera_capture_core::models::format::{PixelFormat, VideoStabilizationMode};
use camera_capture_core::models::photo::{CapturedPhoto, PhotoCaptureSettings};
use camera_capture_core::traits::camera_hardware::SessionKind;
use camera_capture_core::traits::hardware_session::{
    BufferPool, HardwareSession, OutputKind, PhotoCapabilities, PhotoCaptureHandler, PhotoOutputSettings,
    RuntimeErrorCallback, SessionInput, SessionOutput, SubscriptionId, VideoOutputSettings,
};

use crate::hardware_log::HardwareLog;
use crate::pool::VirtualBufferPool;

/// Knobs for what the virtual session supports.
#[derive(Debug, Clone)]
pub struct SessionBehavior {
    pub supported_pixel_formats: Vec<PixelFormat>,
    pub available_code_types: Vec<CodeType>,
    pub photo_capabilities: PhotoCapabilities,
    pub rejected_outputs: Vec<OutputKind>,
    pub reject_inputs: bool,
    /// Complete photo captures right away instead of holding them.
    pub auto_complete_photos: bool,
}

impl Default for SessionBehavior {
    fn default() -> Self {
        Self {
            supported_pixel_formats: vec![PixelFormat::Yuv, PixelFormat::Rgb],
            available_code_types: vec![CodeType::Qr, CodeType::Ean13, CodeType::Code128],
            photo_capabilities: PhotoCapabilities {
                high_resolution_supported: true,
                depth_data_supported: false,
                portrait_effects_matte_supported: false,
            },
            rejected_outputs: Vec::new(),
            reject_inputs: false,
            auto_complete_photos: true,
        }
    }
}

#[derive(Default)]
struct SessionState {
    configuration_depth: u32,
    begins: u32,
    commits: u32,
    unbatched_mutations: u32,
    inputs: Vec<SessionInput>,
    outputs: Vec<SessionOutput>,
    running: bool,
    video_settings: Option<VideoOutputSettings>,
    photo_settings: Option<PhotoOutputSettings>,
    stabilization: Option<VideoStabilizationMode>,
    orientation: Option<(Orientation, bool)>,
    code_filter: Option<(Vec<CodeType>, Option<Rect>)>,
    pending_photos: Vec<PhotoCaptureHandler>,
    last_photo_settings: Option<PhotoCaptureSettings>,
}

/// An in-memory [`HardwareSession`].
///
/// Buffers only flow when a test pushes them with
/// [`emit_video_frame`](Self::emit_video_frame) /
/// [`emit_audio_buffer`](Self::emit_audio_buffer); runtime errors are
/// injected with [`emit_runtime_error`](Self::emit_runtime_error).
pub struct VirtualSession {
    kind: SessionKind,
    prefix: &'static str,
    log: Arc<HardwareLog>,
    clock: SessionClock,
    pool: Arc<VirtualBufferPool>,
    behavior: Mutex<SessionBehavior>,
    state: Mutex<SessionState>,
    subscribers: Mutex<Vec<(SubscriptionId, RuntimeErrorCallback)>>,
    next_subscription: AtomicU64,
}

impl VirtualSession {
    pub fn new(kind: SessionKind, log: Arc<HardwareLog>, clock: SessionClock) -> Self {
        let prefix = match kind {
            SessionKind::Video => "video",
            SessionKind::Audio => "audio",
        };
        Self {
            kind,
            prefix,
            log,
            clock,
            pool: Arc::new(VirtualBufferPool::new()),
            behavior: Mutex::new(SessionBehavior::default()),
            state: Mutex::new(SessionState::default()),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn pool(&self) -> &Arc<VirtualBufferPool> {
        &self.pool
    }

    pub fn update_behavior(&self, update: impl FnOnce(&mut SessionBehavior)) {
        update(&mut self.behavior.lock());
    }

    /// (begin_configuration, commit_configuration) call counts.
    pub fn configuration_calls(&self) -> (u32, u32) {
        let state = self.state.lock();
        (state.begins, state.commits)
    }

    pub fn is_configuring(&self) -> bool {
        self.state.lock().configuration_depth > 0
    }

    /// Input/output changes made outside begin/commit.
    pub fn unbatched_mutations(&self) -> u32 {
        self.state.lock().unbatched_mutations
    }

    pub fn input_descriptors(&self) -> Vec<&'static str> {
        self.state.lock().inputs.iter().map(SessionInput::descriptor).collect()
    }

    pub fn output_kinds(&self) -> Vec<OutputKind> {
        self.state.lock().outputs.iter().map(SessionOutput::kind).collect()
    }

    pub fn video_settings(&self) -> Option<VideoOutputSettings> {
        self.state.lock().video_settings
    }

    pub fn photo_settings(&self) -> Option<PhotoOutputSettings> {
        self.state.lock().photo_settings
    }

    pub fn stabilization(&self) -> Option<VideoStabilizationMode> {
        self.state.lock().stabilization
    }

    pub fn orientation(&self) -> Option<(Orientation, bool)> {
        self.state.lock().orientation
    }

    pub fn code_filter(&self) -> Option<(Vec<CodeType>, Option<Rect>)> {
        self.state.lock().code_filter.clone()
    }

    pub fn last_photo_settings(&self) -> Option<PhotoCaptureSettings> {
        self.state.lock().last_photo_settings.clone()
    }

    pub fn pending_photos(&self) -> usize {
        self.state.lock().pending_photos.len()
    }

    /// Completes the oldest held photo capture with `result`.
    pub fn complete_photo(&self, result: Result<CapturedPhoto, CameraError>) -> bool {
        let pending = {
            let mut state = self.state.lock();
            if state.pending_photos.is_empty() {
                return false;
            }
            state.pending_photos.remove(0)
        };
        (pending.on_capture_started)();
        (pending.on_finished)(result);
        true
    }

    /// Drops every held photo capture without completing it.
    pub fn abandon_photos(&self) {
        self.state.lock().pending_photos.clear();
    }

    /// Pushes one video frame through the video (or standalone code scanner)
    /// output. Returns false when the session is not running or has no
    /// output that streams frames.
    pub fn emit_video_frame(&self, timestamp_ns: i64, width: u32, height: u32) -> bool {
        let (callback, buffer) = {
            let state = self.state.lock();
            if !state.running {
                return false;
            }
            let callback = state.outputs.iter().find_map(|output| match output {
                SessionOutput::Video { on_buffer, .. } => Some(Arc::clone(on_buffer)),
                SessionOutput::CodeScanner { on_buffer: Some(on_buffer) } => Some(Arc::clone(on_buffer)),
                _ => None,
            });
            let Some(callback) = callback else {
                return false;
            };
            let (orientation, is_mirrored) = state.orientation.unwrap_or((Orientation::Portrait, false));
            let pixel_format = state
                .video_settings
                .map(|settings| settings.pixel_format)
                .unwrap_or(PixelFormat::Yuv);
            let buffer = SampleBuffer {
                media_type: MediaType::Video,
                timestamp_ns,
                width,
                height,
                bytes_per_row: width,
                planes: 2,
                pixel_format,
                orientation,
                is_mirrored,
                data: vec![0x80; 16],
            };
            (callback, buffer)
        };
        self.pool.issue();
        callback(buffer, Arc::clone(&self.pool) as Arc<dyn BufferPool>);
        true
    }

    /// Pushes one audio buffer through the audio output.
    pub fn emit_audio_buffer(&self, timestamp_ns: i64) -> bool {
        let callback = {
            let state = self.state.lock();
            if !state.running {
                return false;
            }
            state.outputs.iter().find_map(|output| match output {
                SessionOutput::Audio { on_buffer } => Some(Arc::clone(on_buffer)),
                _ => None,
            })
        };
        match callback {
            Some(callback) => {
                callback(SampleBuffer::audio(timestamp_ns, vec![0; 8]));
                true
            }
            None => false,
        }
    }

    /// Simulates an out-of-band hardware failure; the session stops running.
    pub fn emit_runtime_error(&self, error: CameraError) {
        self.state.lock().running = false;
        let subscribers: Vec<RuntimeErrorCallback> =
            self.subscribers.lock().iter().map(|(_, callback)| Arc::clone(callback)).collect();
        for callback in subscribers {
            callback(error.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn mutate(&self, entry: String, apply: impl FnOnce(&mut SessionState)) {
        let mut state = self.state.lock();
        if state.configuration_depth == 0 {
            log::warn!("{} session mutated outside begin/commit: {}", self.prefix, entry);
            state.unbatched_mutations += 1;
        }
        apply(&mut state);
        drop(state);
        self.log.record(format!("{}.{}", self.prefix, entry));
    }
}

impl HardwareSession for VirtualSession {
    fn begin_configuration(&self) {
        let mut state = self.state.lock();
        state.configuration_depth += 1;
        state.begins += 1;
        drop(state);
        self.log.record(format!("{}.begin", self.prefix));
    }

    fn commit_configuration(&self) {
        let mut state = self.state.lock();
        state.configuration_depth = state.configuration_depth.saturating_sub(1);
        state.commits += 1;
        drop(state);
        self.log.record(format!("{}.commit", self.prefix));
    }

    fn remove_all_inputs(&self) {
        self.mutate("remove-inputs".into(), |state| state.inputs.clear());
    }

    fn can_add_input(&self, _input: &SessionInput) -> bool {
        !self.behavior.lock().reject_inputs
    }

    fn add_input(&self, input: SessionInput) -> Result<(), CameraError> {
        if self.behavior.lock().reject_inputs {
            return Err(ParameterError::UnsupportedInput(input.descriptor().to_string()).into());
        }
        let entry = match &input {
            SessionInput::Camera(device) => format!("add-input={}", device.id()),
            SessionInput::Microphone(microphone) => format!("add-input={}", microphone.id),
        };
        self.mutate(entry, |state| state.inputs.push(input));
        Ok(())
    }

    fn remove_all_outputs(&self) {
        self.mutate("remove-outputs".into(), |state| {
            state.outputs.clear();
            state.video_settings = None;
            state.photo_settings = None;
            state.code_filter = None;
        });
    }

    fn can_add_output(&self, kind: OutputKind) -> bool {
        if self.behavior.lock().rejected_outputs.contains(&kind) {
            return false;
        }
        !self.state.lock().outputs.iter().any(|output| output.kind() == kind)
    }

    fn add_output(&self, output: SessionOutput) -> Result<(), CameraError> {
        let kind = output.kind();
        if !self.can_add_output(kind) {
            return Err(ParameterError::UnsupportedOutput(kind.descriptor().to_string()).into());
        }
        self.mutate(format!("add-output={}", kind.descriptor()), |state| state.outputs.push(output));
        Ok(())
    }

    fn photo_capabilities(&self) -> PhotoCapabilities {
        self.behavior.lock().photo_capabilities
    }

    fn configure_photo_output(&self, settings: PhotoOutputSettings) {
        self.mutate("photo-settings".into(), |state| state.photo_settings = Some(settings));
    }

    fn available_code_types(&self) -> Vec<CodeType> {
        let attached = self
            .state
            .lock()
            .outputs
            .iter()
            .any(|output| output.kind() == OutputKind::CodeScanner);
        if attached {
            self.behavior.lock().available_code_types.clone()
        } else {
            Vec::new()
        }
    }

    fn set_code_scanner_filter(&self, code_types: &[CodeType], region_of_interest: Option<Rect>) {
        let code_types = code_types.to_vec();
        self.mutate("code-filter".into(), |state| {
            state.code_filter = Some((code_types, region_of_interest))
        });
    }

    fn supported_pixel_formats(&self) -> Vec<PixelFormat> {
        self.behavior.lock().supported_pixel_formats.clone()
    }

    fn configure_video_output(&self, settings: VideoOutputSettings) {
        self.mutate(format!("pixel-format={}", settings.pixel_format), |state| {
            state.video_settings = Some(settings)
        });
    }

    fn set_video_stabilization_mode(&self, mode: VideoStabilizationMode) {
        self.mutate(format!("stabilization={}", mode), |state| state.stabilization = Some(mode));
    }

    fn set_output_orientation(&self, orientation: Orientation, mirrored: bool) {
        self.mutate(format!("orientation={}", orientation), |state| {
            state.orientation = Some((orientation, mirrored))
        });
    }

    fn start_running(&self) {
        self.state.lock().running = true;
        self.log.record(format!("{}.start", self.prefix));
    }

    fn stop_running(&self) {
        self.state.lock().running = false;
        self.log.record(format!("{}.stop", self.prefix));
    }

    fn is_running(&self) -> bool {
        self.state.lock().running
    }

    fn clock(&self) -> SessionClock {
        self.clock
    }

    fn capture_photo(&self, settings: PhotoCaptureSettings, handler: PhotoCaptureHandler) {
        self.log.record(format!("{}.capture-photo", self.prefix));
        let has_photo_output = {
            let mut state = self.state.lock();
            state.last_photo_settings = Some(settings);
            state.outputs.iter().any(|output| output.kind() == OutputKind::Photo)
        };
        if !has_photo_output {
            (handler.on_finished)(Err(CaptureError::PhotoNotEnabled.into()));
            return;
        }

        if self.behavior.lock().auto_complete_photos {
            (handler.on_capture_started)();
            (handler.on_finished)(Ok(CapturedPhoto {
                width: 4032,
                height: 3024,
                orientation: Orientation::Portrait,
                is_mirrored: false,
                is_raw: false,
                data: vec![0xFF, 0xD8, 0xFF, 0xD9],
            }));
        } else {
            self.state.lock().pending_photos.push(handler);
        }
    }

    fn subscribe_runtime_errors(&self, callback: RuntimeErrorCallback) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.subscribers.lock().push((id, callback));
        id
    }

    fn unsubscribe_runtime_errors(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|(existing, _)| *existing != id);
    }
}
