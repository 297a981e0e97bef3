use crate::models::camera_types::{Code, CodeType};
use crate::models::error::CameraError;
use crate::processing::frame::Frame;

/// Completion for one scan. Must be called exactly once.
pub type ScanCompletion = Box<dyn FnOnce(Result<Vec<Code>, CameraError>) + Send + 'static>;

/// Asynchronous code decoder (e.g. an ML barcode model).
pub trait BarcodeScanner: Send + Sync {
    /// Start scanning `frame` for `code_types`. The frame stays valid until
    /// `completion` has been called.
    fn scan(&self, frame: &Frame, code_types: &[CodeType], completion: ScanCompletion);
}
