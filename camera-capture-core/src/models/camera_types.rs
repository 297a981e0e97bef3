use serde::{Deserialize, Serialize};

union_value! {
    /// Torch (continuous flashlight) mode.
    pub enum Torch as "torch" {
        Off => "off",
        On => "on",
    }
}

impl Default for Torch {
    fn default() -> Self {
        Torch::Off
    }
}

union_value! {
    /// Orientation used for the preview, photo, video and frame processor outputs.
    pub enum Orientation as "orientation" {
        /// Upright portrait, home indicator at the bottom.
        Portrait => "portrait",
        /// Landscape, home indicator on the left.
        LandscapeLeft => "landscape-left",
        /// Upside-down portrait, home indicator at the top.
        PortraitUpsideDown => "portrait-upside-down",
        /// Landscape, home indicator on the right.
        LandscapeRight => "landscape-right",
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Portrait
    }
}

impl Orientation {
    /// Buckets an arbitrary rotation (in degrees) into the nearest orientation.
    pub fn from_degrees(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        if (45.0..135.0).contains(&normalized) {
            Orientation::LandscapeLeft
        } else if (135.0..225.0).contains(&normalized) {
            Orientation::PortraitUpsideDown
        } else if (225.0..315.0).contains(&normalized) {
            Orientation::LandscapeRight
        } else {
            Orientation::Portrait
        }
    }

    pub fn to_degrees(&self) -> u32 {
        match self {
            Orientation::Portrait => 0,
            Orientation::LandscapeLeft => 90,
            Orientation::PortraitUpsideDown => 180,
            Orientation::LandscapeRight => 270,
        }
    }
}

union_value! {
    /// Physical placement of a camera device.
    pub enum DevicePosition as "position" {
        Back => "back",
        Front => "front",
        External => "external",
    }
}

union_value! {
    pub enum Flash as "flash" {
        Off => "off",
        On => "on",
        Auto => "auto",
    }
}

impl Default for Flash {
    fn default() -> Self {
        Flash::Off
    }
}

union_value! {
    /// Kind of capture that triggered a shutter event.
    pub enum ShutterType as "shutterType" {
        Photo => "photo",
        Snapshot => "snapshot",
    }
}

union_value! {
    /// Machine-readable code symbologies the code scanner can be asked for.
    pub enum CodeType as "codeType" {
        Code128 => "code-128",
        Code39 => "code-39",
        Code93 => "code-93",
        Codabar => "codabar",
        Ean13 => "ean-13",
        Ean8 => "ean-8",
        Itf => "itf",
        UpcE => "upc-e",
        UpcA => "upc-a",
        Qr => "qr",
        Pdf417 => "pdf-417",
        Aztec => "aztec",
        DataMatrix => "data-matrix",
    }
}

/// Runtime authorization state of a capture permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionStatus {
    Granted,
    NotDetermined,
    Denied,
    Restricted,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A code detected by the code scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    #[serde(rename = "type")]
    pub code_type: CodeType,
    pub value: Option<String>,
    pub frame: Option<Rect>,
    pub corners: Vec<Point>,
}

/// Dimensions of the frame a set of codes was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeScannerFrame {
    pub width: u32,
    pub height: u32,
}

/// A camera device as reported by the capability oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescription {
    pub id: String,
    pub name: String,
    pub position: DevicePosition,
}

/// The audio input device used for the audio session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicrophoneInfo {
    pub id: String,
    pub name: String,
}
