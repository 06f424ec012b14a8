//! Recording controller
//!
//! Drives the camera screen: runs the authorization gate once on a background
//! task, wires the capture session in its fixed order, publishes the preview,
//! and serializes start/stop recording against the session state.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};

use crate::authorization::{check_authorization, AuthorizationProvider, AuthorizationResult};
use crate::capture::{CaptureBackend, RecordingDelegate};
use crate::errors::CameraError;
use crate::preview::{Preview, VideoGravity};
use crate::session::CaptureSession;
use crate::storage::{clip_path, DocumentStorage};

/// Controller lifecycle, published so the display layer can observe setup
/// progress instead of inferring it from a missing preview.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Lifecycle {
    Uninitialized,
    AwaitingAuthorization,
    Ready,
    Running,
    /// Terminal: the user or platform refused camera access
    NotAuthorized,
    /// Terminal: session setup failed after authorization
    Failed(String),
}

/// Outcome of a finished recording, published once per recording instance.
///
/// Carries either the finished clip's path or an error message, never both.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordingOutcome {
    pub path: Option<std::path::PathBuf>,
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl RecordingOutcome {
    fn success(path: &Path) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            error: None,
            finished_at: Utc::now(),
        }
    }

    fn failure(error: CameraError) -> Self {
        Self {
            path: None,
            error: Some(error.to_string()),
            finished_at: Utc::now(),
        }
    }
}

/// Owns the capture session and the published recording-screen state.
///
/// All session-mutating operations go through one async mutex, so start and
/// stop calls are serialized against the session's actual state rather than
/// relying on caller discipline.
pub struct RecordingController {
    session: Mutex<CaptureSession>,
    storage: Arc<dyn DocumentStorage>,
    lifecycle_tx: watch::Sender<Lifecycle>,
    preview_tx: watch::Sender<Option<Preview>>,
    recording_tx: watch::Sender<bool>,
    outcome_tx: Arc<watch::Sender<Option<RecordingOutcome>>>,
}

impl RecordingController {
    /// Construct the controller and schedule its one-time initialization.
    ///
    /// Returns immediately; the authorization gate and session setup run on a
    /// spawned task. Must be called from within a Tokio runtime.
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        authorization: Arc<dyn AuthorizationProvider>,
        storage: Arc<dyn DocumentStorage>,
    ) -> Arc<Self> {
        let (lifecycle_tx, _) = watch::channel(Lifecycle::Uninitialized);
        let (preview_tx, _) = watch::channel(None);
        let (recording_tx, _) = watch::channel(false);
        let (outcome_tx, _) = watch::channel(None);

        let controller = Arc::new(Self {
            session: Mutex::new(CaptureSession::new(backend)),
            storage,
            lifecycle_tx,
            preview_tx,
            recording_tx,
            outcome_tx: Arc::new(outcome_tx),
        });

        let task = Arc::clone(&controller);
        tokio::spawn(async move {
            task.initialize(authorization).await;
        });

        controller
    }

    async fn initialize(&self, authorization: Arc<dyn AuthorizationProvider>) {
        self.lifecycle_tx
            .send_replace(Lifecycle::AwaitingAuthorization);

        match check_authorization(authorization.as_ref()).await {
            AuthorizationResult::Permitted => {
                self.lifecycle_tx.send_replace(Lifecycle::Ready);

                let mut session = self.session.lock().await;
                match session.configure() {
                    Ok(()) => {
                        let device = session
                            .input()
                            .map(|d| d.name.clone())
                            .unwrap_or_default();
                        drop(session);

                        self.lifecycle_tx.send_replace(Lifecycle::Running);
                        self.preview_tx.send_replace(Some(Preview::new(
                            device,
                            VideoGravity::ResizeAspectFill,
                        )));
                        log::info!("Capture session running, preview published");
                    }
                    Err(e) => {
                        // configure() already rolled the session back
                        log::error!("Capture session setup failed: {}", e);
                        self.lifecycle_tx
                            .send_replace(Lifecycle::Failed(e.to_string()));
                    }
                }
            }
            AuthorizationResult::NotPermitted => {
                log::warn!("Camera access not permitted, capture session not configured");
                self.lifecycle_tx.send_replace(Lifecycle::NotAuthorized);
            }
        }
    }

    /// Begin recording to a freshly named clip in the documents directory.
    ///
    /// Valid only while the session is running with no active recording.
    /// Missing resources make this a diagnostic no-op: the recording flag
    /// stays false and no file name is generated.
    pub async fn start_recording(&self) {
        let session = self.session.lock().await;

        if *self.lifecycle_tx.borrow() != Lifecycle::Running {
            log::warn!("start_recording ignored: capture session is not running");
            return;
        }

        if *self.recording_tx.borrow() {
            log::warn!("start_recording ignored: a recording is already active");
            return;
        }

        let Some(output) = session.file_output() else {
            log::warn!("{}", CameraError::NoOutputSink);
            return;
        };

        let Some(directory) = self.storage.documents_dir() else {
            log::warn!("{}", CameraError::NoDocumentsDirectory);
            return;
        };

        let path = clip_path(&directory);
        self.recording_tx.send_replace(true);
        log::info!("Recording started: {}", path.display());

        output.start_recording(&path, self.completion_handler());
    }

    /// Finalize the active recording.
    ///
    /// The completion callback fires afterwards with the finished file's
    /// location or an error; it never touches the recording flag.
    pub async fn stop_recording(&self) {
        let session = self.session.lock().await;

        let Some(output) = session.file_output() else {
            log::warn!("{}", CameraError::NoOutputSink);
            return;
        };

        if !*self.recording_tx.borrow() {
            log::warn!("stop_recording ignored: no recording is active");
            return;
        }

        self.recording_tx.send_replace(false);
        output.stop_recording();
        log::info!("Recording stopped");
    }

    fn completion_handler(&self) -> Arc<dyn RecordingDelegate> {
        Arc::new(CompletionHandler {
            outcome_tx: Arc::clone(&self.outcome_tx),
        })
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle_tx.borrow().clone()
    }

    pub fn preview(&self) -> Option<Preview> {
        self.preview_tx.borrow().clone()
    }

    pub fn is_recording(&self) -> bool {
        *self.recording_tx.borrow()
    }

    pub fn last_outcome(&self) -> Option<RecordingOutcome> {
        self.outcome_tx.borrow().clone()
    }

    pub fn subscribe_lifecycle(&self) -> watch::Receiver<Lifecycle> {
        self.lifecycle_tx.subscribe()
    }

    pub fn subscribe_preview(&self) -> watch::Receiver<Option<Preview>> {
        self.preview_tx.subscribe()
    }

    pub fn subscribe_recording(&self) -> watch::Receiver<bool> {
        self.recording_tx.subscribe()
    }

    pub fn subscribe_outcome(&self) -> watch::Receiver<Option<RecordingOutcome>> {
        self.outcome_tx.subscribe()
    }
}

/// Informational completion recipient: reports and publishes the outcome,
/// never mutates the recording flag.
struct CompletionHandler {
    outcome_tx: Arc<watch::Sender<Option<RecordingOutcome>>>,
}

impl RecordingDelegate for CompletionHandler {
    fn did_finish_recording(&self, path: &Path, error: Option<CameraError>) {
        match error {
            Some(e) => {
                log::error!("Recording failed: {}", e);
                self.outcome_tx
                    .send_replace(Some(RecordingOutcome::failure(e)));
            }
            None => {
                log::info!("Finished recording, clip saved to {}", path.display());
                self.outcome_tx
                    .send_replace(Some(RecordingOutcome::success(path)));
            }
        }
    }
}
