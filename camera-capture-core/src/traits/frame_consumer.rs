use crate::processing::frame::Frame;

/// External frame-processor scheduler.
///
/// Receives a retained [`Frame`] together with a monotonically increasing
/// sequence id. The scheduler owns its own threading and must call
/// [`Frame::release`] exactly once when it is done with the frame.
pub trait FrameProcessor: Send + Sync {
    fn process(&self, frame: Frame, sequence: u64);
}

/// Preview render target. Rendering is synchronous; the frame is released
/// by the dispatcher after `render` returns.
pub trait PreviewTarget: Send + Sync {
    fn render(&self, frame: &Frame);
}
