#[macro_use]
mod union;

pub mod buffer;
pub mod camera_types;
pub mod config;
pub mod difference;
pub mod error;
pub mod format;
pub mod photo;
pub mod recording;
pub mod state;
