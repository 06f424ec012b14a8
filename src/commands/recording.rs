//! Tauri commands for the camera recording screen
//!
//! The frontend initializes one controller, renders the published preview,
//! and drives start/stop from its record button.

use std::sync::Arc;

use tauri::command;
use tokio::sync::RwLock;

use crate::authorization::PlatformAuthorization;
use crate::controller::{Lifecycle, RecordingController, RecordingOutcome};
use crate::platform::PlatformBackend;
use crate::preview::Preview;
use crate::storage::PlatformStorage;

// Single controller slot: the recording screen owns one capture session
lazy_static::lazy_static! {
    static ref CONTROLLER: Arc<RwLock<Option<Arc<RecordingController>>>> =
        Arc::new(RwLock::new(None));
}

async fn controller() -> Result<Arc<RecordingController>, String> {
    CONTROLLER
        .read()
        .await
        .clone()
        .ok_or_else(|| "recorder not initialized".to_string())
}

/// Published state of the recording screen
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecorderState {
    pub lifecycle: Lifecycle,
    pub preview: Option<Preview>,
    pub is_recording: bool,
    pub last_outcome: Option<RecordingOutcome>,
}

/// Create the recording controller and kick off authorization and session
/// setup in the background. Idempotent: a second call reuses the live
/// controller.
#[command]
pub async fn initialize_recorder() -> Result<(), String> {
    let mut slot = CONTROLLER.write().await;
    if slot.is_some() {
        log::debug!("Recorder already initialized");
        return Ok(());
    }

    log::info!("Initializing recorder");
    *slot = Some(RecordingController::new(
        Arc::new(PlatformBackend),
        Arc::new(PlatformAuthorization),
        Arc::new(PlatformStorage),
    ));
    Ok(())
}

/// Begin recording a new clip; no-op while not running or already recording
#[command]
pub async fn start_recording() -> Result<bool, String> {
    let controller = controller().await?;
    controller.start_recording().await;
    Ok(controller.is_recording())
}

/// Finalize the active clip; the completion outcome is published afterwards
#[command]
pub async fn stop_recording() -> Result<bool, String> {
    let controller = controller().await?;
    controller.stop_recording().await;
    Ok(controller.is_recording())
}

/// Snapshot of the published recorder state for the frontend to render
#[command]
pub async fn get_recorder_state() -> Result<RecorderState, String> {
    let controller = controller().await?;
    Ok(RecorderState {
        lifecycle: controller.lifecycle(),
        preview: controller.preview(),
        is_recording: controller.is_recording(),
        last_outcome: controller.last_outcome(),
    })
}
