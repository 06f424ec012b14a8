//! Preview handle published to the display layer

/// How the live feed fills the view it is rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VideoGravity {
    /// Fill the view, cropping as needed (the default for the recording screen)
    ResizeAspectFill,
    /// Fit inside the view, letterboxing as needed
    ResizeAspect,
    /// Stretch to the view's bounds
    Resize,
}

/// A display-bound handle through which the live camera feed is rendered.
///
/// Created once, after the capture session starts running; the presentation
/// layer observes it and renders the feed when it is present.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Preview {
    /// Human name of the device feeding the session
    pub device: String,
    pub gravity: VideoGravity,
}

impl Preview {
    pub fn new(device: impl Into<String>, gravity: VideoGravity) -> Self {
        Self {
            device: device.into(),
            gravity,
        }
    }
}
