use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::buffer::{MediaType, SampleBuffer, SessionClock};
use crate::processing::code_scanner_pipeline::{CodeScannerPipeline, CodeScannerStats};
use crate::processing::frame::Frame;
use crate::session::recording::RecordingSession;
use crate::traits::frame_consumer::{FrameProcessor, PreviewTarget};
use crate::traits::hardware_session::BufferPool;

/// Which hardware output produced a video buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSource {
    /// The video data output; feeds every consumer.
    Video,
    /// A code scanner output streaming on its own; feeds only the scanner.
    CodeScanner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    pub frames_dispatched: u64,
    pub frames_without_consumers: u64,
    pub audio_buffers: u64,
    pub code_scanner: CodeScannerStats,
}

/// Fans every captured video buffer out to the attached consumers.
///
/// Runs on the video queue and never blocks on reconfiguration: consumers
/// are swapped in and out behind short read/write locks that are never
/// held while a consumer runs.
#[derive(Default)]
pub struct FrameDispatcher {
    preview: RwLock<Option<Arc<dyn PreviewTarget>>>,
    frame_processor: RwLock<Option<Arc<dyn FrameProcessor>>>,
    code_scanner: RwLock<Option<Arc<CodeScannerPipeline>>>,
    recording: RwLock<Option<Arc<RecordingSession>>>,
    sequence: AtomicU64,
    frames_dispatched: AtomicU64,
    frames_without_consumers: AtomicU64,
    audio_buffers: AtomicU64,
}

impl FrameDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_preview(&self, preview: Option<Arc<dyn PreviewTarget>>) {
        *self.preview.write() = preview;
    }

    pub fn set_frame_processor(&self, processor: Option<Arc<dyn FrameProcessor>>) {
        *self.frame_processor.write() = processor;
    }

    pub fn set_code_scanner(&self, pipeline: Option<Arc<CodeScannerPipeline>>) {
        *self.code_scanner.write() = pipeline;
    }

    pub fn code_scanner(&self) -> Option<Arc<CodeScannerPipeline>> {
        self.code_scanner.read().clone()
    }

    pub fn set_recording(&self, recording: Option<Arc<RecordingSession>>) {
        *self.recording.write() = recording;
    }

    pub fn recording(&self) -> Option<Arc<RecordingSession>> {
        self.recording.read().clone()
    }

    pub fn take_recording(&self) -> Option<Arc<RecordingSession>> {
        self.recording.write().take()
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            frames_dispatched: self.frames_dispatched.load(Ordering::Relaxed),
            frames_without_consumers: self.frames_without_consumers.load(Ordering::Relaxed),
            audio_buffers: self.audio_buffers.load(Ordering::Relaxed),
            code_scanner: self
                .code_scanner
                .read()
                .as_ref()
                .map(|pipeline| pipeline.stats())
                .unwrap_or_default(),
        }
    }

    /// Hands one video buffer to every consumer.
    ///
    /// The frame is retained once per consumer up front. Preview and
    /// recording release synchronously, the frame processor and the code
    /// scanner release whenever they finish.
    pub fn dispatch_video(
        &self,
        buffer: SampleBuffer,
        pool: Arc<dyn BufferPool>,
        clock: SessionClock,
        source: VideoSource,
    ) {
        let feeds_all = source == VideoSource::Video;
        let preview = if feeds_all { self.preview.read().clone() } else { None };
        let recording = if feeds_all { self.recording.read().clone() } else { None };
        let processor = if feeds_all {
            self.frame_processor.read().clone()
        } else {
            None
        };
        let scanner = self.code_scanner.read().clone();

        let consumers = preview.is_some() as u32
            + recording.is_some() as u32
            + processor.is_some() as u32
            + scanner.is_some() as u32;

        let frame = Frame::new(buffer, pool);
        if consumers == 0 {
            self.frames_without_consumers.fetch_add(1, Ordering::Relaxed);
            frame.recycle_unused();
            return;
        }
        if let Err(e) = frame.retain_by(consumers) {
            log::error!("Failed to retain frame: {}", e);
            return;
        }
        self.frames_dispatched.fetch_add(1, Ordering::Relaxed);

        if let Some(preview) = preview {
            preview.render(&frame);
            frame.release_or_log();
        }

        if let Some(recording) = recording {
            // the frame lock is not held while the recorder writes
            let appended = frame
                .with_buffer(SampleBuffer::clone)
                .and_then(|buffer| recording.append_buffer(&buffer, clock, MediaType::Video));
            if let Err(e) = appended {
                log::error!("Failed to append video buffer to recording: {}", e);
            }
            frame.release_or_log();
        }

        if let Some(processor) = processor {
            let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
            processor.process(frame.clone(), sequence);
        }

        if let Some(scanner) = scanner {
            scanner.submit(frame);
        }
    }

    /// Moves an audio buffer onto the video clock and hands it to the
    /// active recording, if any.
    pub fn dispatch_audio(&self, mut buffer: SampleBuffer, audio_clock: SessionClock, video_clock: SessionClock) {
        self.audio_buffers.fetch_add(1, Ordering::Relaxed);
        let Some(recording) = self.recording.read().clone() else {
            return;
        };
        buffer.timestamp_ns = audio_clock.synchronize(buffer.timestamp_ns, video_clock);
        if let Err(e) = recording.append_buffer(&buffer, video_clock, MediaType::Audio) {
            log::error!("Failed to append audio buffer to recording: {}", e);
        }
    }
}
