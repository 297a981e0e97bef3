use std::sync::atomic::{AtomicU64, Ordering};

use camera_capture_core::models::buffer::SampleBuffer;
use camera_capture_core::traits::hardware_session::BufferPool;

/// Counts buffers handed out and returned.
#[derive(Debug, Default)]
pub struct VirtualBufferPool {
    issued: AtomicU64,
    recycled: AtomicU64,
}

impl VirtualBufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn issue(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
    }

    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn recycled(&self) -> u64 {
        self.recycled.load(Ordering::SeqCst)
    }

    /// Buffers still held by consumers.
    pub fn outstanding(&self) -> u64 {
        self.issued().saturating_sub(self.recycled())
    }
}

impl BufferPool for VirtualBufferPool {
    fn recycle(&self, _buffer: SampleBuffer) {
        self.recycled.fetch_add(1, Ordering::SeqCst);
    }
}
