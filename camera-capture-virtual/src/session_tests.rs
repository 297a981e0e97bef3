//! End-to-end tests of `CameraSession` against the virtual backend.

use std::path::PathBuf;
use std::sync::Arc;

use approx::assert_relative_eq;
use futures::executor::block_on;
use parking_lot::Mutex;
use uuid::Uuid;

use camera_capture_core::storage::metadata::read_photo_metadata;
use camera_capture_core::{
    CameraConfiguration, CameraError, CameraHardware, CameraSession, CaptureDevice, Code, CodeScannerFrame,
    CodeScannerOptions, CodeType, Flash, Frame, FrameProcessor, HardwareSession, Location, OutputConfiguration,
    OutputKind, ParameterError, PermissionStatus, PhotoOutputOptions, PixelFormat, Point, PreviewTarget,
    RecordVideoOptions, ShutterType, TakePhotoOptions, Torch, Video, VideoOutputOptions,
};

use crate::camera::VirtualCamera;
use crate::clock::ManualClock;
use crate::delegate::{CollectingDelegate, SessionEvent};
use crate::device::{uhd_format, VirtualDevice};
use crate::recorder::RecorderFailures;
use crate::session::VirtualSession;

struct Fixture {
    camera: Arc<VirtualCamera>,
    delegate: Arc<CollectingDelegate>,
    clock: Arc<ManualClock>,
    session: CameraSession,
    dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let camera = Arc::new(VirtualCamera::with_default_devices().unwrap());
        let delegate = Arc::new(CollectingDelegate::new());
        let clock = Arc::new(ManualClock::new(1_000));
        let session = CameraSession::with_clock(
            Arc::clone(&camera) as Arc<dyn CameraHardware>,
            delegate.clone(),
            clock.clone(),
        );
        let dir = std::env::temp_dir().join(format!("camera-capture-virtual-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        Self {
            camera,
            delegate,
            clock,
            session,
            dir,
        }
    }

    fn configure<F>(&self, mutator: F)
    where
        F: FnOnce(&mut CameraConfiguration) -> Result<(), CameraError>,
    {
        self.session.configure(mutator);
        self.session.wait_until_idle();
    }

    fn video(&self) -> Arc<VirtualSession> {
        self.camera.video_session().unwrap()
    }

    fn audio(&self) -> Arc<VirtualSession> {
        self.camera.audio_session().unwrap()
    }

    fn device(&self, id: &str) -> Arc<VirtualDevice> {
        self.camera.virtual_device(id).unwrap()
    }

    fn record_options(&self) -> RecordVideoOptions {
        RecordVideoOptions {
            directory: Some(self.dir.clone()),
            ..Default::default()
        }
    }

    fn photo_options(&self) -> TakePhotoOptions {
        TakePhotoOptions {
            directory: Some(self.dir.clone()),
            ..Default::default()
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// Back camera streaming video.
fn streaming(config: &mut CameraConfiguration) {
    config.camera_id = Some("back-wide".into());
    config.video = OutputConfiguration::Enabled(VideoOutputOptions::default());
    config.is_active = true;
}

fn base(config: &mut CameraConfiguration) -> Result<(), CameraError> {
    streaming(config);
    Ok(())
}

#[derive(Default)]
struct Outcomes {
    finished: Mutex<Vec<Video>>,
    errors: Mutex<Vec<CameraError>>,
}

fn start_recording(fixture: &Fixture, outcomes: &Arc<Outcomes>) {
    let finished = Arc::clone(outcomes);
    let failed = Arc::clone(outcomes);
    fixture.session.start_recording(
        fixture.record_options(),
        move |video| finished.finished.lock().push(video),
        move |error| failed.errors.lock().push(error),
    );
}

// ---- configuration ----

#[test]
fn initial_configuration_attaches_and_starts() {
    let fixture = Fixture::new();
    fixture.configure(base);

    let video = fixture.video();
    assert_eq!(video.input_descriptors(), vec!["video-input"]);
    assert_eq!(video.output_kinds(), vec![OutputKind::Video]);
    assert!(video.is_running());
    assert_eq!(video.video_settings().unwrap().pixel_format, PixelFormat::Yuv);
    assert_eq!(
        fixture.delegate.events(),
        vec![SessionEvent::Initialized, SessionEvent::Started]
    );

    let log = fixture.camera.log();
    let begin = log.position("video.begin").unwrap();
    let add_input = log.position("video.add-input=back-wide").unwrap();
    let commit = log.position("video.commit").unwrap();
    let start = log.position("video.start").unwrap();
    assert!(begin < add_input && add_input < commit && commit < start);
    assert!(log.contains("back-wide.fps=auto"));
    assert_eq!(fixture.device("back-wide").unlocked_mutations(), 0);
}

#[test]
fn identical_configuration_touches_nothing() {
    let fixture = Fixture::new();
    fixture.configure(base);
    fixture.camera.log().clear();
    fixture.delegate.clear();

    fixture.configure(|_| Ok(()));

    assert!(fixture.camera.log().is_empty(), "{:?}", fixture.camera.log().entries());
    assert!(fixture.delegate.events().is_empty());
}

#[test]
fn zoom_change_only_locks_the_device() {
    let fixture = Fixture::new();
    fixture.configure(base);
    fixture.camera.log().clear();

    fixture.configure(|config| {
        config.zoom = Some(2.0);
        Ok(())
    });

    assert_eq!(
        fixture.camera.log().entries(),
        vec!["back-wide.lock", "back-wide.zoom=2", "back-wide.unlock"]
    );
}

#[test]
fn unsupported_fps_keeps_format_and_frame_rate() {
    let fixture = Fixture::new();
    fixture.configure(base);
    fixture.delegate.clear();

    fixture.configure(|config| {
        config.fps = Some(60);
        Ok(())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["format/invalid-fps"]);
    let device = fixture.device("back-wide");
    assert_eq!(device.active_format().video_size.width, 1920);
    assert_eq!(device.fixed_fps(), None);
    assert!(!device.is_locked());
    // the failed configuration still becomes the current one
    assert_eq!(fixture.session.configuration().unwrap().fps, Some(60));
}

#[test]
fn zoom_is_clamped_to_the_format() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.zoom = Some(999.0);
        Ok(())
    });

    assert!(fixture.delegate.error_codes().is_empty());
    assert_relative_eq!(fixture.device("back-wide").zoom(), 8.0);
    assert_relative_eq!(fixture.session.max_zoom(), 8.0);
}

#[test]
fn exposure_is_clamped_to_the_format() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.camera_id = Some("front".into());
        config.exposure = Some(-10.0);
        Ok(())
    });

    assert_relative_eq!(fixture.device("front").exposure_bias(), -4.0);
}

#[test]
fn session_batch_is_committed_after_errors() {
    let fixture = Fixture::new();
    fixture.configure(base);

    fixture.configure(|config| {
        config.camera_id = Some("missing".into());
        Ok(())
    });
    let video = fixture.video();
    let (begins, commits) = video.configuration_calls();
    assert_eq!(begins, commits);
    assert!(!video.is_configuring());

    fixture.configure(|config| {
        config.camera_id = Some("back-wide".into());
        config.code_scanner = OutputConfiguration::Enabled(CodeScannerOptions {
            code_types: vec![CodeType::Pdf417],
            region_of_interest: None,
        });
        Ok(())
    });
    let (begins, commits) = video.configuration_calls();
    assert_eq!(begins, commits);

    assert_eq!(
        fixture.delegate.error_codes(),
        vec!["device/invalid-device", "code-scanner/code-type-not-supported"]
    );
}

#[test]
fn failing_mutator_discards_the_draft() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        Err(ParameterError::InvalidValue {
            union_name: "cameraId".into(),
            received: "?".into(),
        }
        .into())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["parameter/invalid-parameter"]);
    assert!(fixture.session.configuration().is_none());
    assert!(fixture.camera.log().is_empty());
}

#[test]
fn invalid_draft_is_rejected_before_reconciling() {
    let fixture = Fixture::new();
    fixture.configure(base);
    fixture.camera.log().clear();

    fixture.configure(|config| {
        config.zoom = Some(-1.0);
        Ok(())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["parameter/invalid-parameter"]);
    assert_eq!(fixture.session.configuration().unwrap().zoom, None);
    assert!(fixture.camera.log().is_empty());
}

#[test]
fn format_switch_selects_matching_hardware_format() {
    let fixture = Fixture::new();
    fixture.configure(base);

    fixture.configure(|config| {
        config.format = Some(uhd_format().descriptor());
        Ok(())
    });

    assert!(fixture.delegate.error_codes().is_empty());
    assert!(fixture.camera.log().contains("back-wide.format=3840x2160"));
    assert_eq!(fixture.device("back-wide").active_format().video_size.height, 2160);
}

#[test]
fn unknown_format_is_reported() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        let mut format = uhd_format().descriptor();
        format.video_size.width = 1;
        config.format = Some(format);
        Ok(())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["format/invalid-format"]);
    // the pipeline stopped before the session was started
    assert!(!fixture.session.is_running());
}

#[test]
fn unsupported_pixel_format_is_reported() {
    let fixture = Fixture::new();
    fixture
        .camera
        .video_session()
        .unwrap()
        .update_behavior(|behavior| behavior.supported_pixel_formats = vec![PixelFormat::Yuv]);

    fixture.configure(|config| {
        streaming(config);
        config.video = OutputConfiguration::Enabled(VideoOutputOptions {
            pixel_format: PixelFormat::Rgb,
            ..Default::default()
        });
        Ok(())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["format/invalid-pixel-format"]);
}

#[test]
fn hdr_needs_an_hdr_format() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.video = OutputConfiguration::Enabled(VideoOutputOptions {
            enable_hdr: true,
            ..Default::default()
        });
        Ok(())
    });
    assert_eq!(fixture.delegate.error_codes(), vec!["format/invalid-hdr"]);

    fixture.delegate.clear();
    fixture.configure(|config| {
        config.format = Some(uhd_format().descriptor());
        Ok(())
    });
    assert!(fixture.delegate.error_codes().is_empty());
    assert!(fixture.video().video_settings().unwrap().enable_hdr);
}

#[test]
fn output_only_change_reapplies_the_pixel_format() {
    let fixture = Fixture::new();
    fixture.configure(base);
    fixture.camera.log().clear();

    fixture.configure(|config| {
        config.video = OutputConfiguration::Enabled(VideoOutputOptions {
            pixel_format: PixelFormat::Rgb,
            ..Default::default()
        });
        Ok(())
    });

    assert!(fixture.delegate.error_codes().is_empty());
    assert_eq!(fixture.video().video_settings().unwrap().pixel_format, PixelFormat::Rgb);
    let log = fixture.camera.log();
    let commit = log.position("video.commit").unwrap();
    let lock = log.position("back-wide.lock").unwrap();
    let pixel_format = log.position("video.pixel-format=rgb").unwrap();
    assert!(commit < lock && lock < pixel_format);
    assert!(!fixture.device("back-wide").is_locked());
}

#[test]
fn hdr_toggle_alone_is_checked_against_the_format() {
    let fixture = Fixture::new();
    fixture.configure(base);

    fixture.configure(|config| {
        config.video = OutputConfiguration::Enabled(VideoOutputOptions {
            enable_hdr: true,
            ..Default::default()
        });
        Ok(())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["format/invalid-hdr"]);
}

#[test]
fn photo_hdr_needs_a_photo_hdr_format() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.photo = OutputConfiguration::Enabled(PhotoOutputOptions {
            photo_hdr: true,
            ..Default::default()
        });
        Ok(())
    });
    assert_eq!(fixture.delegate.error_codes(), vec!["format/invalid-hdr"]);

    fixture.delegate.clear();
    fixture.configure(|config| {
        config.format = Some(uhd_format().descriptor());
        Ok(())
    });
    assert!(fixture.delegate.error_codes().is_empty());
    assert!(fixture.video().photo_settings().unwrap().photo_hdr);
}

#[test]
fn torch_is_applied_after_start() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.torch = Torch::On;
        Ok(())
    });

    let log = fixture.camera.log();
    assert!(log.position("video.start").unwrap() < log.position("back-wide.torch=on").unwrap());
    assert_relative_eq!(fixture.device("back-wide").torch_level(), 1.0);
}

#[test]
fn torch_on_front_camera_is_unavailable() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.camera_id = Some("front".into());
        config.torch = Torch::On;
        Ok(())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["device/torch-unavailable"]);
    assert_eq!(fixture.device("front").torch(), Torch::Off);
}

#[test]
fn low_light_boost_on_front_camera_is_unsupported() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.camera_id = Some("front".into());
        config.enable_low_light_boost = true;
        Ok(())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["device/low-light-boost-not-supported"]);
}

#[test]
fn front_camera_output_is_mirrored() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.camera_id = Some("front".into());
        Ok(())
    });

    let (_, mirrored) = fixture.video().orientation().unwrap();
    assert!(mirrored);
}

#[test]
fn missing_hardware_is_reported() {
    let fixture = Fixture::new();
    fixture.camera.set_available(false);
    fixture.configure(base);

    assert_eq!(
        fixture.delegate.error_codes(),
        vec!["device/camera-not-available-on-simulator"]
    );
}

#[test]
fn deactivating_stops_the_session() {
    let fixture = Fixture::new();
    fixture.configure(base);
    fixture.delegate.clear();

    fixture.configure(|config| {
        config.is_active = false;
        Ok(())
    });

    assert!(!fixture.session.is_running());
    assert!(fixture.camera.log().contains("video.stop"));
    assert_eq!(fixture.delegate.events(), vec![SessionEvent::Stopped]);
}

#[test]
fn denied_microphone_permission_is_reported() {
    let fixture = Fixture::new();
    fixture.camera.set_microphone_permission(PermissionStatus::Denied);
    fixture.configure(|config| {
        streaming(config);
        config.audio = OutputConfiguration::Enabled(());
        Ok(())
    });

    assert_eq!(
        fixture.delegate.error_codes(),
        vec!["permission/microphone-permission-denied"]
    );
    let (begins, commits) = fixture.audio().configuration_calls();
    assert_eq!(begins, commits);
    // video is unaffected by the audio failure
    assert!(fixture.session.is_running());
}

// ---- runtime errors ----

#[test]
fn runtime_error_restarts_an_active_session() {
    let fixture = Fixture::new();
    fixture.configure(base);
    fixture.delegate.clear();

    fixture.video().emit_runtime_error(CameraError::unknown("media services were reset"));
    fixture.session.wait_until_idle();

    assert!(fixture.session.is_running());
    assert_eq!(fixture.session.restarts(), 1);
    assert_eq!(fixture.delegate.error_codes(), vec!["unknown/unknown"]);
    assert_eq!(fixture.delegate.events().last(), Some(&SessionEvent::Started));
}

#[test]
fn runtime_error_does_not_restart_an_inactive_session() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.is_active = false;
        Ok(())
    });

    fixture.video().emit_runtime_error(CameraError::unknown("device disconnected"));
    fixture.session.wait_until_idle();

    assert!(!fixture.session.is_running());
    assert_eq!(fixture.session.restarts(), 0);
}

#[test]
fn dropping_the_session_unsubscribes() {
    let fixture = Fixture::new();
    let video = fixture.video();
    assert_eq!(video.subscriber_count(), 1);

    drop(fixture);
    assert_eq!(video.subscriber_count(), 0);
}

// ---- frames ----

#[derive(Default)]
struct ReleasingProcessor {
    sequences: Mutex<Vec<u64>>,
}

impl FrameProcessor for ReleasingProcessor {
    fn process(&self, frame: Frame, sequence: u64) {
        self.sequences.lock().push(sequence);
        frame.release().unwrap();
    }
}

#[derive(Default)]
struct CountingPreview {
    rendered: Mutex<Vec<i64>>,
}

impl PreviewTarget for CountingPreview {
    fn render(&self, frame: &Frame) {
        assert!(frame.is_valid());
        self.rendered.lock().push(frame.timestamp());
    }
}

#[test]
fn every_frame_returns_to_the_pool() {
    let fixture = Fixture::new();
    let processor = Arc::new(ReleasingProcessor::default());
    let preview = Arc::new(CountingPreview::default());
    fixture.session.set_frame_processor(Some(processor.clone()));
    fixture.session.set_preview_target(Some(preview.clone()));
    fixture.configure(|config| {
        streaming(config);
        config.preview = OutputConfiguration::Enabled(());
        Ok(())
    });

    let video = fixture.video();
    assert!(video.emit_video_frame(33_000_000, 1920, 1080));
    assert!(video.emit_video_frame(66_000_000, 1920, 1080));

    assert_eq!(*processor.sequences.lock(), vec![0, 1]);
    assert_eq!(*preview.rendered.lock(), vec![33_000_000, 66_000_000]);
    assert_eq!(video.pool().issued(), 2);
    assert_eq!(video.pool().outstanding(), 0);

    fixture.session.set_frame_processor(None);
    fixture.session.set_preview_target(None);
    assert!(video.emit_video_frame(99_000_000, 1920, 1080));

    let stats = fixture.session.stats();
    assert_eq!(stats.frames_dispatched, 2);
    assert_eq!(stats.frames_without_consumers, 1);
    assert_eq!(video.pool().outstanding(), 0);
}

#[test]
fn code_scanner_scans_one_frame_at_a_time() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        config.camera_id = Some("back-wide".into());
        config.code_scanner = OutputConfiguration::Enabled(CodeScannerOptions {
            code_types: vec![CodeType::Qr],
            region_of_interest: None,
        });
        config.is_active = true;
        Ok(())
    });
    assert!(fixture.delegate.error_codes().is_empty());
    assert_eq!(fixture.video().code_filter().unwrap().0, vec![CodeType::Qr]);

    let video = fixture.video();
    let scanner = fixture.camera.scanner();
    for i in 1..=3 {
        assert!(video.emit_video_frame(i * 33_000_000, 1920, 1080));
    }
    assert_eq!(scanner.pending(), 1);
    assert_eq!(video.pool().outstanding(), 1);
    assert_eq!(fixture.session.stats().code_scanner.dropped, 2);

    let code = Code {
        code_type: CodeType::Qr,
        value: Some("https://example.org".into()),
        frame: None,
        corners: vec![],
    };
    assert!(scanner.complete_next(Ok(vec![code.clone()])));
    assert_eq!(video.pool().outstanding(), 0);
    assert_eq!(
        fixture.delegate.events().last(),
        Some(&SessionEvent::CodeScanned(
            vec![code],
            CodeScannerFrame {
                width: 1920,
                height: 1080
            }
        ))
    );

    assert!(video.emit_video_frame(4 * 33_000_000, 1920, 1080));
    assert_eq!(scanner.scanned().len(), 2);
    assert_eq!(scanner.scanned()[0], (33_000_000, vec![CodeType::Qr]));
}

#[test]
fn code_scanner_without_decoder_is_reported() {
    let fixture = Fixture::new();
    fixture.camera.set_scanner_available(false);
    fixture.configure(|config| {
        streaming(config);
        config.code_scanner = OutputConfiguration::Enabled(CodeScannerOptions {
            code_types: vec![CodeType::Ean13],
            region_of_interest: None,
        });
        Ok(())
    });

    assert_eq!(fixture.delegate.error_codes(), vec!["code-scanner/scanner-unavailable"]);
}

// ---- recording ----

#[test]
fn recording_with_audio_synchronizes_clocks() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        streaming(config);
        config.audio = OutputConfiguration::Enabled(());
        Ok(())
    });
    let outcomes = Arc::new(Outcomes::default());
    start_recording(&fixture, &outcomes);
    fixture.session.wait_until_idle();
    assert!(outcomes.errors.lock().is_empty());
    assert!(fixture.session.is_recording());
    assert!(fixture.audio().is_running());

    let video = fixture.video();
    let audio = fixture.audio();
    // audio before the first video frame is dropped
    assert!(audio.emit_audio_buffer(2_000_000));
    assert!(video.emit_video_frame(10_000_000, 1920, 1080));
    assert!(audio.emit_audio_buffer(20_000_000));

    let probe = fixture.camera.last_recorder().unwrap();
    assert_eq!(probe.session_start(), Some(9_000_000));
    assert_eq!(probe.video_timestamps(), vec![9_000_000]);
    assert_eq!(probe.audio_timestamps(), vec![15_000_000]);
    assert!(probe.settings().enable_audio);
    assert!(probe.settings().bit_rate > 0);

    fixture.clock.advance(2_500);
    let stopped = fixture.session.stop_recording().unwrap();
    fixture.session.wait_until_idle();

    assert_eq!(stopped.duration_ms, 2_500);
    assert_eq!(*outcomes.finished.lock(), vec![stopped.clone()]);
    assert!(stopped.path.exists());
    assert_eq!(stopped.path.extension().unwrap(), "mov");
    assert!(stopped
        .path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("VID_"));
    assert!(!fixture.session.is_recording());
    assert!(!fixture.audio().is_running());
    assert!(probe.is_released());

    let err = fixture.session.stop_recording().unwrap_err();
    assert_eq!(err.code(), "capture/no-recording-in-progress");
}

#[test]
fn paused_recording_drops_buffers() {
    let fixture = Fixture::new();
    fixture.configure(base);
    let outcomes = Arc::new(Outcomes::default());
    start_recording(&fixture, &outcomes);

    let video = fixture.video();
    video.emit_video_frame(10_000_000, 1920, 1080);
    fixture.session.pause_recording().unwrap();
    video.emit_video_frame(20_000_000, 1920, 1080);
    fixture.session.resume_recording().unwrap();
    video.emit_video_frame(30_000_000, 1920, 1080);

    let probe = fixture.camera.last_recorder().unwrap();
    assert_eq!(probe.video_timestamps(), vec![9_000_000, 29_000_000]);
    assert_eq!(video.pool().outstanding(), 0);

    let err = fixture.session.resume_recording().unwrap_err();
    assert_eq!(err.code(), "capture/invalid-recording-state");
    fixture.session.stop_recording().unwrap();
}

#[test]
fn recorder_failure_stops_the_recording() {
    let fixture = Fixture::new();
    fixture.configure(base);
    let outcomes = Arc::new(Outcomes::default());
    start_recording(&fixture, &outcomes);

    let probe = fixture.camera.last_recorder().unwrap();
    probe.trigger_error(100, -38);

    assert!(!fixture.session.is_recording());
    assert_eq!(outcomes.finished.lock().len(), 1);
    assert_eq!(
        *outcomes.errors.lock(),
        vec![CameraError::Recorder {
            name: "server-died".into(),
            code: -38
        }]
    );
    assert!(probe.is_stopped());
}

#[test]
fn recording_needs_the_video_output() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        config.camera_id = Some("back-wide".into());
        config.photo = OutputConfiguration::Enabled(PhotoOutputOptions::default());
        config.is_active = true;
        Ok(())
    });
    let outcomes = Arc::new(Outcomes::default());
    start_recording(&fixture, &outcomes);

    let codes: Vec<String> = outcomes.errors.lock().iter().map(CameraError::code).collect();
    assert_eq!(codes, vec!["capture/video-not-enabled"]);
    assert!(fixture.camera.recorders().is_empty());
}

#[test]
fn second_recording_is_rejected() {
    let fixture = Fixture::new();
    fixture.configure(base);
    let first = Arc::new(Outcomes::default());
    let second = Arc::new(Outcomes::default());
    start_recording(&fixture, &first);
    start_recording(&fixture, &second);

    assert!(first.errors.lock().is_empty());
    assert_eq!(second.errors.lock()[0].code(), "capture/recording-in-progress");
    fixture.session.stop_recording().unwrap();
    assert!(second.finished.lock().is_empty());
}

#[test]
fn failed_recorder_start_leaves_no_recording() {
    let fixture = Fixture::new();
    fixture.camera.set_recorder_failures(RecorderFailures {
        fail_prepare: true,
        ..Default::default()
    });
    fixture.configure(base);
    let outcomes = Arc::new(Outcomes::default());
    start_recording(&fixture, &outcomes);

    assert_eq!(outcomes.errors.lock().len(), 1);
    assert!(outcomes.finished.lock().is_empty());
    assert!(!fixture.session.is_recording());
    assert!(fixture.camera.last_recorder().unwrap().is_released());
}

// ---- photos ----

fn photo_config(config: &mut CameraConfiguration) -> Result<(), CameraError> {
    streaming(config);
    config.photo = OutputConfiguration::Enabled(PhotoOutputOptions {
        enable_high_quality_photos: true,
        ..Default::default()
    });
    Ok(())
}

#[test]
fn take_photo_writes_image_and_metadata() {
    let fixture = Fixture::new();
    fixture.camera.set_location(Some(Location {
        latitude: 52.52,
        longitude: 13.405,
        altitude: None,
    }));
    fixture.configure(|config| {
        photo_config(config)?;
        config.enable_location = true;
        Ok(())
    });
    assert!(fixture.video().photo_settings().unwrap().high_resolution);

    let photo = block_on(fixture.session.take_photo(fixture.photo_options())).unwrap();

    assert_eq!((photo.width, photo.height), (4032, 3024));
    assert_eq!(photo.path.extension().unwrap(), "jpg");
    assert_eq!(std::fs::read(&photo.path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    assert_eq!(read_photo_metadata(&photo.path).unwrap(), photo);
    assert!(photo.location.is_some());
    assert!(fixture
        .delegate
        .events()
        .contains(&SessionEvent::Shutter(ShutterType::Photo)));
}

#[test]
fn take_photo_without_photo_output_fails() {
    let fixture = Fixture::new();
    fixture.configure(base);

    let err = block_on(fixture.session.take_photo(fixture.photo_options())).unwrap_err();
    assert_eq!(err.code(), "capture/photo-not-enabled");
    assert!(!fixture.camera.log().contains("video.capture-photo"));
}

#[test]
fn flash_on_front_camera_is_unavailable() {
    let fixture = Fixture::new();
    fixture.configure(|config| {
        photo_config(config)?;
        config.camera_id = Some("front".into());
        Ok(())
    });

    let options = TakePhotoOptions {
        flash: Flash::On,
        ..fixture.photo_options()
    };
    let err = block_on(fixture.session.take_photo(options)).unwrap_err();
    assert_eq!(err.code(), "device/flash-unavailable");
}

#[test]
fn abandoned_capture_is_aborted() {
    let fixture = Fixture::new();
    fixture.configure(photo_config);
    let video = fixture.video();
    video.update_behavior(|behavior| behavior.auto_complete_photos = false);

    let capture = fixture.session.take_photo(fixture.photo_options());
    fixture.session.wait_until_idle();
    assert_eq!(video.pending_photos(), 1);

    video.abandon_photos();
    let err = block_on(capture).unwrap_err();
    assert_eq!(err.code(), "capture/aborted");
}

// ---- focus ----

#[test]
fn focus_validates_point_and_device() {
    let fixture = Fixture::new();

    let err = fixture.session.focus(Point::new(0.5, 0.5)).unwrap_err();
    assert_eq!(err.code(), "session/camera-not-ready");

    fixture.configure(base);
    let err = fixture.session.focus(Point::new(1.5, 0.5)).unwrap_err();
    assert_eq!(err.code(), "parameter/invalid-parameter");

    fixture.session.focus(Point::new(0.25, 0.75)).unwrap();
    let device = fixture.device("back-wide");
    assert_eq!(device.focus_point(), Some(Point::new(0.25, 0.75)));
    assert!(!device.is_locked());
    assert_eq!(device.unlocked_mutations(), 0);

    fixture.configure(|config| {
        config.camera_id = Some("front".into());
        Ok(())
    });
    let err = fixture.session.focus(Point::new(0.5, 0.5)).unwrap_err();
    assert_eq!(err.code(), "device/focus-not-supported");
}
