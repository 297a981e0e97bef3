use super::camera_types::Orientation;
use super::format::PixelFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Video,
    Audio,
}

/// One captured buffer as delivered by the hardware.
///
/// Timestamps are in nanoseconds on the clock of the session that produced
/// the buffer (see [`SessionClock`]).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub media_type: MediaType,
    pub timestamp_ns: i64,
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: u32,
    pub planes: u32,
    pub pixel_format: PixelFormat,
    pub orientation: Orientation,
    pub is_mirrored: bool,
    pub data: Vec<u8>,
}

impl SampleBuffer {
    /// An audio buffer; audio has no image geometry.
    pub fn audio(timestamp_ns: i64, data: Vec<u8>) -> Self {
        Self {
            media_type: MediaType::Audio,
            timestamp_ns,
            width: 0,
            height: 0,
            bytes_per_row: 0,
            planes: 0,
            pixel_format: PixelFormat::Native,
            orientation: Orientation::Portrait,
            is_mirrored: false,
            data,
        }
    }
}

/// The clock of one hardware session, expressed as an offset from the shared
/// host clock.
///
/// Audio and video are captured by two independently clocked sessions, so
/// audio timestamps must be moved onto the video clock before they can be
/// muxed next to video frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionClock {
    pub offset_from_host_ns: i64,
}

impl SessionClock {
    pub fn new(offset_from_host_ns: i64) -> Self {
        Self { offset_from_host_ns }
    }

    pub fn to_host(&self, timestamp_ns: i64) -> i64 {
        timestamp_ns - self.offset_from_host_ns
    }

    pub fn from_host(&self, host_ns: i64) -> i64 {
        host_ns + self.offset_from_host_ns
    }

    /// Converts a timestamp taken on this clock into `target`'s time base.
    pub fn synchronize(&self, timestamp_ns: i64, target: SessionClock) -> i64 {
        target.from_host(self.to_host(timestamp_ns))
    }
}
