pub mod audio;
pub mod camera_session;
pub mod configuration;
pub mod lifecycle;
pub mod locks;
pub mod photo;
pub mod queue;
pub mod recording;
pub mod video;
