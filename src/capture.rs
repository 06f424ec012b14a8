//! Capture capability contract
//!
//! The media framework underneath the session is an external capability:
//! device lookup, input/output attachment checks, and the file-output sink
//! are reached through these traits. The platform module provides the real
//! implementation; the testing module provides offline mocks.

use std::path::Path;
use std::sync::Arc;

use crate::errors::CameraError;

/// A video input device as reported by device enumeration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoDevice {
    pub id: String,
    pub name: String,
}

impl VideoDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The platform media framework behind a capture session.
pub trait CaptureBackend: Send + Sync {
    /// Default video device, if any is connected
    fn default_video_device(&self) -> Option<VideoDevice>;

    /// Pre-check: will the session accept this device as input?
    fn can_add_input(&self, device: &VideoDevice) -> bool;

    /// Pre-check: will the session accept a file-output sink?
    fn can_add_output(&self) -> bool;

    /// Create the file-output sink for this session
    fn make_file_output(&self) -> Arc<dyn FileOutput>;

    /// Start the capture pipeline
    fn start_running(&self);

    /// Stop the capture pipeline
    fn stop_running(&self);
}

/// File-output sink writing one recording at a time to a local path.
pub trait FileOutput: Send + Sync {
    /// Begin writing a recording to `path`, reporting completion to `delegate`
    fn start_recording(&self, path: &Path, delegate: Arc<dyn RecordingDelegate>);

    /// Finalize the current recording
    fn stop_recording(&self);
}

/// One-shot completion notification for a finished recording.
///
/// Fired once per recording instance, on a thread owned by the output sink,
/// with either the finished file's location or an error - never both.
pub trait RecordingDelegate: Send + Sync {
    fn did_finish_recording(&self, path: &Path, error: Option<CameraError>);
}
