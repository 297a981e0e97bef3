use std::collections::VecDeque;

use parking_lot::Mutex;

use camera_capture_core::models::camera_types::{Code, CodeType};
use camera_capture_core::models::error::CameraError;
use camera_capture_core::processing::frame::Frame;
use camera_capture_core::traits::barcode_scanner::{BarcodeScanner, ScanCompletion};

/// A [`BarcodeScanner`] whose results are decided by the test.
///
/// By default scans are held until [`complete_next`](Self::complete_next);
/// with [`set_auto_result`](Self::set_auto_result) they complete inline.
#[derive(Default)]
pub struct VirtualBarcodeScanner {
    auto_result: Mutex<Option<Vec<Code>>>,
    pending: Mutex<VecDeque<ScanCompletion>>,
    scanned: Mutex<Vec<(i64, Vec<CodeType>)>>,
}

impl VirtualBarcodeScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_auto_result(&self, codes: Option<Vec<Code>>) {
        *self.auto_result.lock() = codes;
    }

    /// Frame timestamps handed to the scanner, with the requested code types.
    pub fn scanned(&self) -> Vec<(i64, Vec<CodeType>)> {
        self.scanned.lock().clone()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn complete_next(&self, result: Result<Vec<Code>, CameraError>) -> bool {
        let completion = self.pending.lock().pop_front();
        match completion {
            Some(completion) => {
                completion(result);
                true
            }
            None => false,
        }
    }
}

impl BarcodeScanner for VirtualBarcodeScanner {
    fn scan(&self, frame: &Frame, code_types: &[CodeType], completion: ScanCompletion) {
        self.scanned.lock().push((frame.timestamp(), code_types.to_vec()));
        let auto_result = self.auto_result.lock().clone();
        match auto_result {
            Some(codes) => completion(Ok(codes)),
            None => self.pending.lock().push_back(completion),
        }
    }
}
