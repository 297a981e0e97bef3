use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::camera_types::{CodeScannerFrame, CodeType};
use crate::processing::frame::Frame;
use crate::traits::barcode_scanner::BarcodeScanner;
use crate::traits::camera_delegate::CameraSessionDelegate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodeScannerStats {
    pub scanned: u64,
    pub dropped: u64,
}

#[derive(Default)]
struct Counters {
    is_busy: AtomicBool,
    scanned: AtomicU64,
    dropped: AtomicU64,
}

/// Feeds frames into a [`BarcodeScanner`] one at a time.
///
/// Only one scan is ever in flight. Frames arriving while a scan is running
/// are released and dropped immediately, never queued.
pub struct CodeScannerPipeline {
    scanner: Arc<dyn BarcodeScanner>,
    code_types: Vec<CodeType>,
    delegate: Arc<dyn CameraSessionDelegate>,
    counters: Arc<Counters>,
}

impl CodeScannerPipeline {
    pub fn new(
        scanner: Arc<dyn BarcodeScanner>,
        code_types: Vec<CodeType>,
        delegate: Arc<dyn CameraSessionDelegate>,
    ) -> Self {
        Self {
            scanner,
            code_types,
            delegate,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn code_types(&self) -> &[CodeType] {
        &self.code_types
    }

    pub fn is_busy(&self) -> bool {
        self.counters.is_busy.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> CodeScannerStats {
        CodeScannerStats {
            scanned: self.counters.scanned.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    /// Takes over one reference of `frame`; it is released when the scan
    /// completes, or right away when the frame is dropped.
    pub fn submit(&self, frame: Frame) {
        if self
            .counters
            .is_busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            frame.release_or_log();
            return;
        }

        let scanner_frame = CodeScannerFrame {
            width: frame.width(),
            height: frame.height(),
        };
        let counters = Arc::clone(&self.counters);
        let delegate = Arc::clone(&self.delegate);
        let held = frame.clone();

        self.scanner.scan(
            &frame,
            &self.code_types,
            Box::new(move |result| {
                held.release_or_log();
                counters.scanned.fetch_add(1, Ordering::Relaxed);
                counters.is_busy.store(false, Ordering::Release);

                match result {
                    Ok(codes) if !codes.is_empty() => delegate.on_code_scanned(&codes, scanner_frame),
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("Code scan failed: {}", e);
                        delegate.on_error(&e);
                    }
                }
            }),
        );
    }
}
