use serde::{Deserialize, Serialize};

union_value! {
    /// Pixel format streamed by the video output.
    pub enum PixelFormat as "pixelFormat" {
        Yuv => "yuv",
        Rgb => "rgb",
        /// Whatever the hardware streams natively for the active format.
        Native => "native",
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::Native
    }
}

union_value! {
    pub enum VideoStabilizationMode as "videoStabilizationMode" {
        Off => "off",
        Standard => "standard",
        Cinematic => "cinematic",
        CinematicExtended => "cinematic-extended",
        Auto => "auto",
    }
}

impl Default for VideoStabilizationMode {
    fn default() -> Self {
        VideoStabilizationMode::Off
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A continuous range of frame rates supported by a hardware format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRateRange {
    pub min_fps: f64,
    pub max_fps: f64,
}

impl FrameRateRange {
    pub fn new(min_fps: f64, max_fps: f64) -> Self {
        Self { min_fps, max_fps }
    }

    /// Whether `fps` lies within this range (inclusive).
    pub fn includes(&self, fps: f64) -> bool {
        fps >= self.min_fps && fps <= self.max_fps
    }
}

/// Structural description of a format, as requested by the application.
///
/// Two formats are the same format when their descriptors are equal; this is
/// the only matching rule used when selecting a hardware format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub photo_size: Size,
    pub video_size: Size,
    pub min_fps: f64,
    pub max_fps: f64,
    pub supports_video_hdr: bool,
    pub supports_photo_hdr: bool,
    pub video_stabilization_modes: Vec<VideoStabilizationMode>,
}

/// A format as reported by the hardware for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFormat {
    pub photo_size: Size,
    pub video_size: Size,
    pub frame_rate_ranges: Vec<FrameRateRange>,
    pub supports_video_hdr: bool,
    pub supports_photo_hdr: bool,
    pub video_stabilization_modes: Vec<VideoStabilizationMode>,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub min_exposure_bias: f64,
    pub max_exposure_bias: f64,
}

impl DeviceFormat {
    /// Collapses the hardware format into the descriptor the application sees.
    pub fn descriptor(&self) -> FormatDescriptor {
        let min_fps = self
            .frame_rate_ranges
            .iter()
            .map(|r| r.min_fps)
            .fold(f64::INFINITY, f64::min);
        let max_fps = self
            .frame_rate_ranges
            .iter()
            .map(|r| r.max_fps)
            .fold(0.0, f64::max);
        FormatDescriptor {
            photo_size: self.photo_size,
            video_size: self.video_size,
            min_fps: if min_fps.is_finite() { min_fps } else { 0.0 },
            max_fps,
            supports_video_hdr: self.supports_video_hdr,
            supports_photo_hdr: self.supports_photo_hdr,
            video_stabilization_modes: self.video_stabilization_modes.clone(),
        }
    }

    pub fn matches(&self, target: &FormatDescriptor) -> bool {
        self.descriptor() == *target
    }

    /// Whether at least one frame rate range of this format includes `fps`.
    pub fn supports_fps(&self, fps: f64) -> bool {
        self.frame_rate_ranges.iter().any(|r| r.includes(fps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(video: Size, ranges: Vec<FrameRateRange>) -> DeviceFormat {
        DeviceFormat {
            photo_size: Size::new(4032, 3024),
            video_size: video,
            frame_rate_ranges: ranges,
            supports_video_hdr: false,
            supports_photo_hdr: false,
            video_stabilization_modes: vec![VideoStabilizationMode::Off],
            min_zoom: 1.0,
            max_zoom: 8.0,
            min_exposure_bias: -8.0,
            max_exposure_bias: 8.0,
        }
    }

    #[test]
    fn descriptor_spans_all_ranges() {
        let f = format(
            Size::new(1920, 1080),
            vec![FrameRateRange::new(1.0, 30.0), FrameRateRange::new(60.0, 60.0)],
        );
        let d = f.descriptor();
        assert_eq!(d.min_fps, 1.0);
        assert_eq!(d.max_fps, 60.0);
    }

    #[test]
    fn supports_fps_checks_each_range() {
        let f = format(
            Size::new(1920, 1080),
            vec![FrameRateRange::new(1.0, 30.0), FrameRateRange::new(60.0, 60.0)],
        );
        assert!(f.supports_fps(24.0));
        assert!(f.supports_fps(60.0));
        // Gap between the two ranges.
        assert!(!f.supports_fps(45.0));
    }

    #[test]
    fn matches_is_structural() {
        let a = format(Size::new(1920, 1080), vec![FrameRateRange::new(24.0, 30.0)]);
        let b = format(Size::new(3840, 2160), vec![FrameRateRange::new(24.0, 30.0)]);
        assert!(a.matches(&a.descriptor()));
        assert!(!b.matches(&a.descriptor()));
    }
}
