//! Testing utilities for ClipCam
//!
//! Offline stand-ins for the platform capabilities (authorization, capture,
//! storage) so the recording screen can be exercised without hardware or OS
//! permission dialogs.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::authorization::{AuthorizationProvider, AuthorizationStatus};
use crate::capture::{CaptureBackend, FileOutput, RecordingDelegate, VideoDevice};
use crate::errors::CameraError;
use crate::storage::DocumentStorage;

/// Authorization provider with a canned status and prompt answer.
pub struct StubAuthorization {
    status: AuthorizationStatus,
    grants: bool,
    prompts: AtomicUsize,
}

impl StubAuthorization {
    pub fn new(status: AuthorizationStatus, grants: bool) -> Self {
        Self {
            status,
            grants,
            prompts: AtomicUsize::new(0),
        }
    }

    /// How many times the user was prompted
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationProvider for StubAuthorization {
    fn query_status(&self) -> AuthorizationStatus {
        self.status
    }

    async fn request_access(&self) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.grants
    }
}

/// Authorization provider whose prompt never resolves, pinning the
/// controller in its awaiting-authorization state.
pub struct PendingAuthorization;

#[async_trait]
impl AuthorizationProvider for PendingAuthorization {
    fn query_status(&self) -> AuthorizationStatus {
        AuthorizationStatus::NotDetermined
    }

    async fn request_access(&self) -> bool {
        std::future::pending::<bool>().await
    }
}

/// In-memory capture backend with a single shared file-output sink.
pub struct MockBackend {
    device: Option<VideoDevice>,
    accept_input: bool,
    accept_output: bool,
    output: Arc<MockFileOutput>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            device: Some(VideoDevice::new("0", "Mock Camera")),
            accept_input: true,
            accept_output: true,
            output: Arc::new(MockFileOutput::new()),
        }
    }

    /// No default video device is connected
    pub fn without_device(mut self) -> Self {
        self.device = None;
        self
    }

    /// The session refuses the video input
    pub fn rejecting_input(mut self) -> Self {
        self.accept_input = false;
        self
    }

    /// The session refuses the file-output sink
    pub fn rejecting_output(mut self) -> Self {
        self.accept_output = false;
        self
    }

    /// The sink this backend hands out, for inspecting recordings
    pub fn output(&self) -> Arc<MockFileOutput> {
        Arc::clone(&self.output)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for MockBackend {
    fn default_video_device(&self) -> Option<VideoDevice> {
        self.device.clone()
    }

    fn can_add_input(&self, _device: &VideoDevice) -> bool {
        self.accept_input
    }

    fn can_add_output(&self) -> bool {
        self.accept_output
    }

    fn make_file_output(&self) -> Arc<dyn FileOutput> {
        self.output()
    }

    fn start_running(&self) {}

    fn stop_running(&self) {}
}

struct ActiveMockRecording {
    path: PathBuf,
    delegate: Arc<dyn RecordingDelegate>,
}

/// File-output sink that records paths instead of video and fires its
/// completion delegate synchronously on stop.
pub struct MockFileOutput {
    active: Mutex<Option<ActiveMockRecording>>,
    recorded: Mutex<Vec<PathBuf>>,
    completions: AtomicUsize,
    fail_next: AtomicBool,
}

impl MockFileOutput {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            recorded: Mutex::new(Vec::new()),
            completions: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Every path a recording was started to, in order
    pub fn recorded_paths(&self) -> Vec<PathBuf> {
        self.recorded.lock().unwrap().clone()
    }

    /// How many completion callbacks have fired
    pub fn completion_count(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    /// Make the next recording finish with an error
    pub fn fail_next_recording(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Default for MockFileOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl FileOutput for MockFileOutput {
    fn start_recording(&self, path: &Path, delegate: Arc<dyn RecordingDelegate>) {
        self.recorded.lock().unwrap().push(path.to_path_buf());
        *self.active.lock().unwrap() = Some(ActiveMockRecording {
            path: path.to_path_buf(),
            delegate,
        });
    }

    fn stop_recording(&self) {
        let Some(recording) = self.active.lock().unwrap().take() else {
            return;
        };

        self.completions.fetch_add(1, Ordering::SeqCst);
        let error = if self.fail_next.swap(false, Ordering::SeqCst) {
            Some(CameraError::RecordingFailed(
                "mock encoder failure".to_string(),
            ))
        } else {
            None
        };
        recording.delegate.did_finish_recording(&recording.path, error);
    }
}

/// Storage rooted in the system temp directory.
pub struct TempStorage {
    directory: PathBuf,
}

impl TempStorage {
    pub fn new() -> Self {
        Self {
            directory: std::env::temp_dir(),
        }
    }

    pub fn at(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl Default for TempStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStorage for TempStorage {
    fn documents_dir(&self) -> Option<PathBuf> {
        Some(self.directory.clone())
    }
}

/// Storage whose directory lookup always fails.
pub struct NoStorage;

impl DocumentStorage for NoStorage {
    fn documents_dir(&self) -> Option<PathBuf> {
        None
    }
}
