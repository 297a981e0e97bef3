use super::config::CameraConfiguration;

/// Which reconfiguration phases are dirty between two configurations.
///
/// Flags cascade along the order the phases are applied in: a phase is also
/// dirty when a phase it depends on is dirty (e.g. a new input device needs its
/// outputs, format, torch and exposure re-applied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Difference {
    pub input_changed: bool,
    pub outputs_changed: bool,
    pub video_stabilization_changed: bool,
    pub orientation_changed: bool,
    pub format_changed: bool,
    pub side_props_changed: bool,
    pub torch_changed: bool,
    pub zoom_changed: bool,
    pub exposure_changed: bool,
    pub audio_session_changed: bool,
}

impl Difference {
    /// Computes the difference between the active configuration `left` (None
    /// if nothing was configured yet) and the new configuration `right`.
    pub fn between(left: Option<&CameraConfiguration>, right: &CameraConfiguration) -> Self {
        let Some(left) = left else {
            return Self::everything();
        };

        let input_changed = left.camera_id != right.camera_id;
        let outputs_changed = input_changed
            || left.preview != right.preview
            || left.photo != right.photo
            || left.video != right.video
            || left.code_scanner != right.code_scanner;
        let video_stabilization_changed =
            outputs_changed || left.video_stabilization_mode != right.video_stabilization_mode;
        let orientation_changed = outputs_changed || left.orientation != right.orientation;
        let format_changed = input_changed || left.format != right.format;
        let side_props_changed = format_changed
            || left.fps != right.fps
            || left.enable_low_light_boost != right.enable_low_light_boost;
        let torch_changed = input_changed || left.torch != right.torch;
        let zoom_changed = format_changed || left.zoom != right.zoom;
        let exposure_changed = input_changed || left.exposure != right.exposure;
        let audio_session_changed = left.audio != right.audio;

        Self {
            input_changed,
            outputs_changed,
            video_stabilization_changed,
            orientation_changed,
            format_changed,
            side_props_changed,
            torch_changed,
            zoom_changed,
            exposure_changed,
            audio_session_changed,
        }
    }

    fn everything() -> Self {
        Self {
            input_changed: true,
            outputs_changed: true,
            video_stabilization_changed: true,
            orientation_changed: true,
            format_changed: true,
            side_props_changed: true,
            torch_changed: true,
            zoom_changed: true,
            exposure_changed: true,
            audio_session_changed: true,
        }
    }

    /// Inputs, outputs, stabilization or orientation need the session lock.
    pub fn is_session_configuration_dirty(&self) -> bool {
        self.input_changed
            || self.outputs_changed
            || self.video_stabilization_changed
            || self.orientation_changed
    }

    /// Format, side-props, zoom or exposure need the device lock. Re-added
    /// outputs do too: the video output's pixel format is applied under it.
    pub fn is_device_configuration_dirty(&self) -> bool {
        self.outputs_changed
            || self.format_changed
            || self.side_props_changed
            || self.zoom_changed
            || self.exposure_changed
    }

    pub fn has_changes(&self) -> bool {
        *self != Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::camera_types::{Orientation, Torch};
    use crate::models::config::{OutputConfiguration, PhotoOutputOptions, VideoOutputOptions};
    use crate::models::format::{PixelFormat, Size};

    fn base() -> CameraConfiguration {
        CameraConfiguration {
            camera_id: Some("back-wide".into()),
            video: OutputConfiguration::Enabled(VideoOutputOptions::default()),
            fps: Some(30),
            zoom: Some(1.0),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn first_configuration_dirties_everything() {
        let diff = Difference::between(None, &CameraConfiguration::default());
        assert_eq!(diff, Difference::everything());
        assert!(diff.is_session_configuration_dirty());
        assert!(diff.is_device_configuration_dirty());
    }

    #[test]
    fn identical_configurations_are_clean() {
        let config = base();
        let diff = Difference::between(Some(&config), &config.clone());
        assert!(!diff.has_changes());
        assert!(!diff.is_session_configuration_dirty());
        assert!(!diff.is_device_configuration_dirty());
    }

    #[test]
    fn active_flag_alone_is_not_a_phase() {
        let left = base();
        let right = CameraConfiguration {
            is_active: false,
            ..left.clone()
        };
        assert!(!Difference::between(Some(&left), &right).has_changes());
    }

    #[test]
    fn zoom_only_flags_zoom() {
        let left = base();
        let right = CameraConfiguration {
            zoom: Some(2.0),
            ..left.clone()
        };
        let diff = Difference::between(Some(&left), &right);
        assert_eq!(
            diff,
            Difference {
                zoom_changed: true,
                ..Default::default()
            }
        );
        assert!(!diff.is_session_configuration_dirty());
        assert!(diff.is_device_configuration_dirty());
    }

    #[test]
    fn torch_only_flags_torch() {
        let left = base();
        let right = CameraConfiguration {
            torch: Torch::On,
            ..left.clone()
        };
        let diff = Difference::between(Some(&left), &right);
        assert_eq!(
            diff,
            Difference {
                torch_changed: true,
                ..Default::default()
            }
        );
        assert!(!diff.is_device_configuration_dirty());
    }

    #[test]
    fn output_sub_fields_flag_outputs() {
        let left = base();
        let right = CameraConfiguration {
            video: OutputConfiguration::Enabled(VideoOutputOptions {
                pixel_format: PixelFormat::Rgb,
                ..Default::default()
            }),
            ..left.clone()
        };
        let diff = Difference::between(Some(&left), &right);
        assert!(diff.outputs_changed);
        assert!(diff.video_stabilization_changed);
        assert!(diff.orientation_changed);
        assert!(!diff.input_changed);
        assert!(!diff.format_changed);
        // the re-added video output needs its pixel format under the device lock
        assert!(diff.is_device_configuration_dirty());

        let right = CameraConfiguration {
            photo: OutputConfiguration::Enabled(PhotoOutputOptions {
                target_size: Some(Size::new(1920, 1080)),
                ..Default::default()
            }),
            ..left.clone()
        };
        assert!(Difference::between(Some(&left), &right).outputs_changed);
    }

    #[test]
    fn orientation_does_not_touch_outputs() {
        let left = base();
        let right = CameraConfiguration {
            orientation: Orientation::LandscapeLeft,
            ..left.clone()
        };
        let diff = Difference::between(Some(&left), &right);
        assert!(diff.orientation_changed);
        assert!(!diff.outputs_changed);
        assert!(!diff.video_stabilization_changed);
        assert!(!diff.is_device_configuration_dirty());
    }

    #[test]
    fn new_device_cascades_into_dependent_phases() {
        let left = base();
        let right = CameraConfiguration {
            camera_id: Some("front".into()),
            ..left.clone()
        };
        let diff = Difference::between(Some(&left), &right);
        assert!(diff.input_changed);
        assert!(diff.outputs_changed);
        assert!(diff.format_changed);
        assert!(diff.side_props_changed);
        assert!(diff.zoom_changed);
        assert!(diff.exposure_changed);
        assert!(diff.torch_changed);
        assert!(!diff.audio_session_changed);
    }

    #[test]
    fn audio_is_independent() {
        let left = base();
        let right = CameraConfiguration {
            audio: OutputConfiguration::Enabled(()),
            ..left.clone()
        };
        let diff = Difference::between(Some(&left), &right);
        assert_eq!(
            diff,
            Difference {
                audio_session_changed: true,
                ..Default::default()
            }
        );
    }
}
