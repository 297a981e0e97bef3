use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::models::camera_types::MicrophoneInfo;
use crate::models::config::CameraConfiguration;
use crate::models::difference::Difference;
use crate::models::error::{CameraError, SessionError};
use crate::processing::frame_dispatcher::{DispatchStats, FrameDispatcher};
use crate::session::lifecycle::SessionLifecycle;
use crate::session::queue::DispatchQueue;
use crate::traits::camera_delegate::CameraSessionDelegate;
use crate::traits::camera_hardware::{CameraHardware, SessionKind};
use crate::traits::capture_device::CaptureDevice;
use crate::traits::clock::{Clock, SystemClock};
use crate::traits::frame_consumer::{FrameProcessor, PreviewTarget};
use crate::traits::hardware_session::{HardwareSession, OutputKind, RuntimeErrorCallback, SubscriptionId};

/// What is currently attached to the hardware sessions.
#[derive(Default)]
pub(crate) struct AttachedState {
    pub device: Option<Arc<dyn CaptureDevice>>,
    pub outputs: Vec<OutputKind>,
    pub microphone: Option<MicrophoneInfo>,
}

pub(crate) struct SessionInner {
    pub hardware: Arc<dyn CameraHardware>,
    pub delegate: Arc<dyn CameraSessionDelegate>,
    pub clock: Arc<dyn Clock>,
    pub video_session: Arc<dyn HardwareSession>,
    pub audio_session: Arc<dyn HardwareSession>,
    pub camera_queue: DispatchQueue,
    pub audio_queue: DispatchQueue,
    pub configuration: Mutex<Option<Arc<CameraConfiguration>>>,
    pub attached: Mutex<AttachedState>,
    pub dispatcher: Arc<FrameDispatcher>,
    pub lifecycle: SessionLifecycle,
    pub preview_target: RwLock<Option<Arc<dyn PreviewTarget>>>,
}

impl SessionInner {
    pub fn current_configuration(&self) -> Option<Arc<CameraConfiguration>> {
        self.configuration.lock().clone()
    }

    pub fn current_device(&self) -> Option<Arc<dyn CaptureDevice>> {
        self.attached.lock().device.clone()
    }

    pub fn has_output(&self, kind: OutputKind) -> bool {
        self.attached.lock().outputs.contains(&kind)
    }

    pub fn report(&self, error: &CameraError) {
        log::error!("{} ({})", error, error.code());
        self.delegate.on_error(error);
    }
}

/// A camera session: one video capture session plus one audio capture
/// session, reconciled towards the latest requested configuration.
///
/// All hardware mutation happens on the camera queue (video) and the audio
/// queue (audio). Completion and failures are reported through the
/// [`CameraSessionDelegate`], never returned to the caller of
/// [`configure`](Self::configure).
pub struct CameraSession {
    pub(crate) inner: Arc<SessionInner>,
    subscriptions: Vec<(Arc<dyn HardwareSession>, SubscriptionId)>,
}

impl CameraSession {
    pub fn new(hardware: Arc<dyn CameraHardware>, delegate: Arc<dyn CameraSessionDelegate>) -> Self {
        Self::with_clock(hardware, delegate, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new) with a custom wall clock for recording durations.
    pub fn with_clock(
        hardware: Arc<dyn CameraHardware>,
        delegate: Arc<dyn CameraSessionDelegate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let video_session = hardware.create_session(SessionKind::Video);
        let audio_session = hardware.create_session(SessionKind::Audio);

        let inner = Arc::new(SessionInner {
            hardware,
            delegate,
            clock,
            video_session: Arc::clone(&video_session),
            audio_session: Arc::clone(&audio_session),
            camera_queue: DispatchQueue::new("camera.session"),
            audio_queue: DispatchQueue::new("camera.audio"),
            configuration: Mutex::new(None),
            attached: Mutex::new(AttachedState::default()),
            dispatcher: Arc::new(FrameDispatcher::new()),
            lifecycle: SessionLifecycle::new(),
            preview_target: RwLock::new(None),
        });

        let video_id = video_session.subscribe_runtime_errors(video_runtime_error_handler(&inner));
        let audio_id = audio_session.subscribe_runtime_errors(audio_runtime_error_handler(&inner));

        Self {
            inner,
            subscriptions: vec![(video_session, video_id), (audio_session, audio_id)],
        }
    }

    /// Requests a new configuration.
    ///
    /// `mutator` edits a draft cloned from the current configuration. If it
    /// (or validation) fails, the draft is discarded and the error goes to the
    /// delegate. Otherwise the draft becomes the current configuration right
    /// away and the hardware is converged towards it in the background.
    pub fn configure<F>(&self, mutator: F)
    where
        F: FnOnce(&mut CameraConfiguration) -> Result<(), CameraError>,
    {
        log::info!("Updating session configuration...");
        let mut draft = self
            .inner
            .current_configuration()
            .map(|config| (*config).clone())
            .unwrap_or_default();

        if let Err(e) = mutator(&mut draft).and_then(|_| draft.validate()) {
            self.inner.report(&e);
            return;
        }

        let (config, difference) = {
            let mut current = self.inner.configuration.lock();
            let difference = Difference::between(current.as_deref(), &draft);
            let config = Arc::new(draft);
            *current = Some(Arc::clone(&config));
            (config, difference)
        };
        log::debug!("Configuration difference: {:?}", difference);

        let inner = Arc::clone(&self.inner);
        let video_config = Arc::clone(&config);
        self.inner.camera_queue.dispatch(move || {
            inner.apply_configuration(&video_config, &difference);
        });

        if difference.audio_session_changed {
            let inner = Arc::clone(&self.inner);
            self.inner.audio_queue.dispatch(move || {
                if let Err(e) = inner.configure_audio_session(&config) {
                    inner.report(&e);
                }
            });
        }
    }

    /// Blocks until all reconfiguration queued so far has been applied.
    pub fn wait_until_idle(&self) {
        self.inner.camera_queue.wait_until_idle();
        self.inner.audio_queue.wait_until_idle();
    }

    pub fn configuration(&self) -> Option<Arc<CameraConfiguration>> {
        self.inner.current_configuration()
    }

    pub fn is_running(&self) -> bool {
        self.inner.video_session.is_running()
    }

    pub fn device(&self) -> Option<Arc<dyn CaptureDevice>> {
        self.inner.current_device()
    }

    /// The maximum zoom factor of the active format, 1.0 without a device.
    pub fn max_zoom(&self) -> f64 {
        self.inner
            .current_device()
            .map(|device| device.active_format().max_zoom)
            .unwrap_or(1.0)
    }

    pub fn set_frame_processor(&self, processor: Option<Arc<dyn FrameProcessor>>) {
        self.inner.dispatcher.set_frame_processor(processor);
    }

    /// Sets the render target used while the preview output is enabled.
    pub fn set_preview_target(&self, target: Option<Arc<dyn PreviewTarget>>) {
        *self.inner.preview_target.write() = target.clone();
        if self.inner.has_output(OutputKind::Preview) {
            self.inner.dispatcher.set_preview(target);
        }
    }

    pub fn is_recording(&self) -> bool {
        self.inner.dispatcher.recording().is_some()
    }

    pub fn stats(&self) -> DispatchStats {
        self.inner.dispatcher.stats()
    }

    /// Number of automatic restarts after runtime errors.
    pub fn restarts(&self) -> u64 {
        self.inner.lifecycle.restarts()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        for (session, id) in self.subscriptions.drain(..) {
            session.unsubscribe_runtime_errors(id);
        }
        if let Some(recording) = self.inner.dispatcher.recording() {
            if let Err(e) = recording.stop() {
                log::warn!("Failed to stop recording on teardown: {}", e);
            }
        }
    }
}

fn video_runtime_error_handler(inner: &Arc<SessionInner>) -> RuntimeErrorCallback {
    let weak = Arc::downgrade(inner);
    Arc::new(move |error| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let session = Arc::clone(&inner);
        inner.camera_queue.dispatch(move || {
            let transition = session.lifecycle.handle_runtime_error(
                session.video_session.as_ref(),
                &error,
                session.delegate.as_ref(),
            );
            if transition.is_some() {
                session.delegate.on_started();
            }
        });
    })
}

fn audio_runtime_error_handler(inner: &Arc<SessionInner>) -> RuntimeErrorCallback {
    let weak = Arc::downgrade(inner);
    Arc::new(move |error| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let session = Arc::clone(&inner);
        inner.audio_queue.dispatch(move || {
            session.report(&error);
            let needs_audio = session
                .dispatcher
                .recording()
                .map(|recording| recording.settings().enable_audio)
                .unwrap_or(false);
            if needs_audio && !session.audio_session.is_running() {
                session.audio_session.start_running();
            }
        });
    })
}

pub(crate) fn not_ready() -> CameraError {
    SessionError::CameraNotReady.into()
}
