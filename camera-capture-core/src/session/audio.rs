use std::sync::{Arc, Weak};

use crate::models::camera_types::PermissionStatus;
use crate::models::config::CameraConfiguration;
use crate::models::error::{CameraError, DeviceError, ParameterError, PermissionError};
use crate::session::camera_session::SessionInner;
use crate::session::locks::SessionConfigurationGuard;
use crate::traits::hardware_session::{
    AudioBufferCallback, HardwareSession, OutputKind, SessionInput, SessionOutput,
};

impl SessionInner {
    /// Attaches or detaches the microphone and the audio data output.
    /// Runs on the audio queue, independently of the video session.
    pub(crate) fn configure_audio_session(&self, config: &CameraConfiguration) -> Result<(), CameraError> {
        let _lock = SessionConfigurationGuard::begin(self.audio_session.as_ref());
        log::info!("Configuring audio session...");
        let enable_audio = config.audio.is_enabled();

        if enable_audio && self.hardware.microphone_permission() != PermissionStatus::Granted {
            return Err(PermissionError::Microphone.into());
        }

        self.audio_session.remove_all_inputs();
        self.attached.lock().microphone = None;

        if enable_audio {
            log::info!("Adding audio input...");
            let microphone = self.hardware.microphone().ok_or(DeviceError::MicrophoneUnavailable)?;
            let input = SessionInput::Microphone(microphone.clone());
            if !self.audio_session.can_add_input(&input) {
                return Err(ParameterError::UnsupportedInput(input.descriptor().to_string()).into());
            }
            self.audio_session.add_input(input)?;
            self.attached.lock().microphone = Some(microphone);
        }

        self.audio_session.remove_all_outputs();

        if enable_audio {
            log::info!("Adding audio data output...");
            if !self.audio_session.can_add_output(OutputKind::Audio) {
                return Err(ParameterError::UnsupportedOutput(OutputKind::Audio.descriptor().to_string()).into());
            }
            self.audio_session.add_output(SessionOutput::Audio {
                on_buffer: self.audio_buffer_callback(),
            })?;
        }

        log::info!("Successfully configured audio session");
        Ok(())
    }

    fn audio_buffer_callback(&self) -> AudioBufferCallback {
        let dispatcher = Arc::clone(&self.dispatcher);
        let audio: Weak<dyn HardwareSession> = Arc::downgrade(&self.audio_session);
        let video: Weak<dyn HardwareSession> = Arc::downgrade(&self.video_session);
        Arc::new(move |buffer| {
            let (Some(audio), Some(video)) = (audio.upgrade(), video.upgrade()) else {
                return;
            };
            dispatcher.dispatch_audio(buffer, audio.clock(), video.clock());
        })
    }
}
