use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::buffer::SampleBuffer;
use crate::models::camera_types::Orientation;
use crate::models::error::{CameraError, FrameError};
use crate::models::format::PixelFormat;
use crate::traits::hardware_session::BufferPool;

struct FrameState {
    ref_count: u32,
    buffer: Option<SampleBuffer>,
}

struct FrameInner {
    state: Mutex<FrameState>,
    pool: Arc<dyn BufferPool>,
    width: u32,
    height: u32,
    timestamp_ns: i64,
    orientation: Orientation,
    is_mirrored: bool,
    pixel_format: PixelFormat,
    bytes_per_row: u32,
    planes: u32,
}

/// Shared, reference-counted handle to one hardware video buffer.
///
/// The count starts at zero; the dispatcher retains once per consumer before
/// handing the frame out and every consumer releases exactly once. When the
/// count drops back to zero the buffer goes back to its pool and the frame
/// becomes invalid. Cloning a `Frame` does not touch the count.
#[derive(Clone)]
pub struct Frame {
    inner: Arc<FrameInner>,
}

impl Frame {
    pub fn new(buffer: SampleBuffer, pool: Arc<dyn BufferPool>) -> Self {
        let inner = FrameInner {
            width: buffer.width,
            height: buffer.height,
            timestamp_ns: buffer.timestamp_ns,
            orientation: buffer.orientation,
            is_mirrored: buffer.is_mirrored,
            pixel_format: buffer.pixel_format,
            bytes_per_row: buffer.bytes_per_row,
            planes: buffer.planes,
            state: Mutex::new(FrameState {
                ref_count: 0,
                buffer: Some(buffer),
            }),
            pool,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn retain(&self) -> Result<(), CameraError> {
        self.retain_by(1)
    }

    /// Adds `count` references at once. Fails once the buffer has been recycled.
    pub fn retain_by(&self, count: u32) -> Result<(), CameraError> {
        let mut state = self.inner.state.lock();
        if state.buffer.is_none() {
            return Err(FrameError::Invalid.into());
        }
        state.ref_count += count;
        Ok(())
    }

    /// Drops one reference, recycling the buffer when the last one goes.
    ///
    /// Releasing more often than retained is reported, never ignored.
    pub fn release(&self) -> Result<(), CameraError> {
        let recycled = {
            let mut state = self.inner.state.lock();
            if state.ref_count == 0 {
                log::error!(
                    "Frame at {} ns released more often than it was retained",
                    self.inner.timestamp_ns
                );
                return Err(FrameError::OverReleased.into());
            }
            state.ref_count -= 1;
            if state.ref_count == 0 {
                state.buffer.take()
            } else {
                None
            }
        };
        if let Some(buffer) = recycled {
            self.inner.pool.recycle(buffer);
        }
        Ok(())
    }

    /// Releases from a consumer that has nobody to hand the error to.
    pub(crate) fn release_or_log(&self) {
        if let Err(e) = self.release() {
            log::error!("Failed to release frame: {}", e);
        }
    }

    /// Returns the buffer to the pool when no consumer ever retained it.
    pub(crate) fn recycle_unused(self) {
        let buffer = {
            let mut state = self.inner.state.lock();
            if state.ref_count != 0 {
                return;
            }
            state.buffer.take()
        };
        if let Some(buffer) = buffer {
            self.inner.pool.recycle(buffer);
        }
    }

    pub fn ref_count(&self) -> u32 {
        self.inner.state.lock().ref_count
    }

    /// A frame is valid while at least one consumer holds a reference.
    pub fn is_valid(&self) -> bool {
        let state = self.inner.state.lock();
        state.ref_count > 0 && state.buffer.is_some()
    }

    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    pub fn timestamp(&self) -> i64 {
        self.inner.timestamp_ns
    }

    pub fn orientation(&self) -> Orientation {
        self.inner.orientation
    }

    pub fn is_mirrored(&self) -> bool {
        self.inner.is_mirrored
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.inner.pixel_format
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.inner.bytes_per_row
    }

    pub fn planes(&self) -> u32 {
        self.inner.planes
    }

    /// Runs `f` against the underlying buffer while the frame is still backed.
    pub fn with_buffer<R>(&self, f: impl FnOnce(&SampleBuffer) -> R) -> Result<R, CameraError> {
        let state = self.inner.state.lock();
        match state.buffer.as_ref() {
            Some(buffer) => Ok(f(buffer)),
            None => Err(FrameError::Invalid.into()),
        }
    }

    /// Copies out the pixel bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CameraError> {
        self.with_buffer(|buffer| buffer.data.clone())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .field("timestamp_ns", &self.inner.timestamp_ns)
            .field("ref_count", &self.ref_count())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{video_buffer, CountingPool};
    use super::*;

    #[test]
    fn recycles_after_exactly_n_releases() {
        let pool = Arc::new(CountingPool::default());
        let frame = Frame::new(video_buffer(10), pool.clone());
        frame.retain_by(3).unwrap();

        frame.release().unwrap();
        frame.release().unwrap();
        assert!(pool.recycled.lock().is_empty());
        assert!(frame.is_valid());

        frame.release().unwrap();
        assert_eq!(*pool.recycled.lock(), vec![10]);
        assert!(!frame.is_valid());
    }

    #[test]
    fn over_release_is_reported() {
        let pool = Arc::new(CountingPool::default());
        let frame = Frame::new(video_buffer(1), pool.clone());
        frame.retain().unwrap();
        frame.release().unwrap();

        let err = frame.release().unwrap_err();
        assert_eq!(err, CameraError::Frame(FrameError::OverReleased));
        assert_eq!(frame.ref_count(), 0);
        assert_eq!(pool.recycled.lock().len(), 1);
    }

    #[test]
    fn recycled_frame_cannot_be_retained_or_read() {
        let pool = Arc::new(CountingPool::default());
        let frame = Frame::new(video_buffer(1), pool);
        frame.retain().unwrap();
        assert_eq!(frame.to_bytes().unwrap(), vec![7; 8]);
        frame.release().unwrap();

        assert!(frame.retain().is_err());
        assert!(frame.to_bytes().is_err());
        assert_eq!(frame.width(), 4);
    }

    #[test]
    fn unused_frame_goes_straight_back() {
        let pool = Arc::new(CountingPool::default());
        Frame::new(video_buffer(5), pool.clone()).recycle_unused();
        assert_eq!(*pool.recycled.lock(), vec![5]);
    }
}
