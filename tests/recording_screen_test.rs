//! End-to-end recording screen scenarios against the public API

use std::sync::Arc;
use std::time::Duration;

use clipcam::platform::PlatformFileOutput;
use clipcam::testing::{MockBackend, StubAuthorization, TempStorage};
use clipcam::{
    AuthorizationStatus, CaptureBackend, FileOutput, Lifecycle, RecordingController, VideoDevice,
    VideoGravity,
};

async fn wait_for_settled(controller: &RecordingController) -> Lifecycle {
    let mut rx = controller.subscribe_lifecycle();
    let state = rx
        .wait_for(|state| {
            matches!(
                state,
                Lifecycle::Running | Lifecycle::NotAuthorized | Lifecycle::Failed(_)
            )
        })
        .await
        .expect("controller task dropped")
        .clone();
    state
}

#[tokio::test]
async fn grant_flow_reaches_running_with_a_fill_aspect_preview() {
    let backend = Arc::new(MockBackend::new());
    let auth = Arc::new(StubAuthorization::new(
        AuthorizationStatus::NotDetermined,
        true,
    ));
    let controller = RecordingController::new(backend, auth, Arc::new(TempStorage::new()));

    assert_eq!(wait_for_settled(&controller).await, Lifecycle::Running);

    let preview = controller.preview().expect("preview published after start");
    assert_eq!(preview.gravity, VideoGravity::ResizeAspectFill);
}

#[tokio::test]
async fn deny_flow_never_publishes_a_preview() {
    let backend = Arc::new(MockBackend::new());
    let auth = Arc::new(StubAuthorization::new(AuthorizationStatus::Denied, false));
    let controller = RecordingController::new(backend, auth, Arc::new(TempStorage::new()));

    assert_eq!(wait_for_settled(&controller).await, Lifecycle::NotAuthorized);
    assert!(controller.preview().is_none());

    // Still absent after further interaction
    controller.start_recording().await;
    assert!(controller.preview().is_none());
    assert!(!controller.is_recording());
}

/// Backend pairing the mock device lookup with the real file-output sink,
/// so clips actually land on disk.
struct DiskBackend {
    output: Arc<PlatformFileOutput>,
}

impl DiskBackend {
    fn new() -> Self {
        Self {
            output: Arc::new(PlatformFileOutput::new()),
        }
    }
}

impl CaptureBackend for DiskBackend {
    fn default_video_device(&self) -> Option<VideoDevice> {
        Some(VideoDevice::new("0", "Disk Test Camera"))
    }

    fn can_add_input(&self, _device: &VideoDevice) -> bool {
        true
    }

    fn can_add_output(&self) -> bool {
        true
    }

    fn make_file_output(&self) -> Arc<dyn FileOutput> {
        Arc::clone(&self.output) as Arc<dyn FileOutput>
    }

    fn start_running(&self) {}

    fn stop_running(&self) {}
}

#[tokio::test]
async fn recorded_clip_lands_in_the_documents_directory() {
    let documents = tempfile::tempdir().expect("temp documents dir");
    let backend = Arc::new(DiskBackend::new());
    let auth = Arc::new(StubAuthorization::new(AuthorizationStatus::Authorized, true));
    let controller = RecordingController::new(
        backend,
        auth,
        Arc::new(TempStorage::at(documents.path())),
    );
    assert_eq!(wait_for_settled(&controller).await, Lifecycle::Running);

    controller.start_recording().await;
    assert!(controller.is_recording());

    controller.stop_recording().await;
    assert!(!controller.is_recording());

    // Completion fires on the sink's own thread; wait for the outcome
    let mut outcomes = controller.subscribe_outcome();
    let outcome = tokio::time::timeout(Duration::from_secs(2), async {
        outcomes
            .wait_for(|outcome| outcome.is_some())
            .await
            .expect("controller dropped")
            .clone()
    })
    .await
    .expect("completion callback should fire")
    .expect("outcome present");

    let path = outcome.path.expect("successful outcome carries the path");
    assert!(outcome.error.is_none());
    assert!(path.exists(), "clip file remains on disk");
    assert_eq!(path.extension().unwrap(), "mp4");
    assert!(path.starts_with(documents.path()));
}
