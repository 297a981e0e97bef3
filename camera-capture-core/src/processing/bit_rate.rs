use crate::models::format::Size;
use crate::models::recording::VideoCodec;

/// Reference H.264 bit rates at 30 fps and 8-bit depth.
const PROFILES: &[(u32, u32, f64)] = &[
    (176, 144, 192_000.0),
    (320, 240, 768_000.0),
    (352, 288, 1_000_000.0),
    (640, 480, 2_500_000.0),
    (720, 480, 3_500_000.0),
    (1280, 720, 6_000_000.0),
    (1920, 1080, 10_000_000.0),
    (2048, 1080, 12_000_000.0),
    (2560, 1440, 16_000_000.0),
    (3840, 2160, 40_000_000.0),
    (4096, 2160, 45_000_000.0),
    (7680, 4320, 120_000_000.0),
];

const PROFILE_FPS: f64 = 30.0;
const PROFILE_BIT_DEPTH: f64 = 8.0;

/// Recommended video bit rate (bits per second) for recording at `size`.
///
/// Picks the standard profile closest in pixel count and scales it to the
/// target frame rate, bit depth (10-bit when HDR) and codec.
pub fn recommended_bit_rate(size: Size, fps: Option<u32>, codec: VideoCodec, hdr: bool) -> f64 {
    let area = size.area() as i64;
    let (_, _, base) = PROFILES
        .iter()
        .copied()
        .min_by_key(|(w, h, _)| ((*w as i64) * (*h as i64) - area).abs())
        .unwrap_or((1920, 1080, 10_000_000.0));

    let fps = fps.map(f64::from).unwrap_or(PROFILE_FPS);
    let bit_depth = if hdr { 10.0 } else { 8.0 };

    let mut bit_rate = base / PROFILE_FPS * fps;
    bit_rate = bit_rate / PROFILE_BIT_DEPTH * bit_depth;
    if codec == VideoCodec::H265 {
        // HEVC needs roughly 20% less for the same quality
        bit_rate *= 0.8;
    }
    bit_rate
}

/// Applies the caller's override or multiplier on top of the recommendation.
pub fn resolve_bit_rate(recommended: f64, override_bps: Option<f64>, multiplier: Option<f64>) -> u32 {
    let bit_rate = match (override_bps, multiplier) {
        (Some(bps), _) if bps > 0.0 => bps,
        (_, Some(m)) if m > 0.0 => recommended * m,
        _ => recommended,
    };
    bit_rate.round().min(u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn picks_closest_profile() {
        let rate = recommended_bit_rate(Size::new(1920, 1080), Some(30), VideoCodec::H264, false);
        assert_relative_eq!(rate, 10_000_000.0);

        // 1900x1000 is still closest to 1080p
        let rate = recommended_bit_rate(Size::new(1900, 1000), None, VideoCodec::H264, false);
        assert_relative_eq!(rate, 10_000_000.0);
    }

    #[test]
    fn scales_by_fps_depth_and_codec() {
        let rate = recommended_bit_rate(Size::new(3840, 2160), Some(60), VideoCodec::H265, true);
        // 40M * 2 (fps) * 1.25 (10-bit) * 0.8 (hevc)
        assert_relative_eq!(rate, 80_000_000.0);
    }

    #[test]
    fn override_wins_over_multiplier() {
        assert_eq!(resolve_bit_rate(10_000_000.0, Some(5_000_000.0), Some(2.0)), 5_000_000);
        assert_eq!(resolve_bit_rate(10_000_000.0, None, Some(1.5)), 15_000_000);
        assert_eq!(resolve_bit_rate(10_000_000.0, None, None), 10_000_000);
    }
}
