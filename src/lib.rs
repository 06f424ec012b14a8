//! ClipCam: a minimal camera recording screen for Tauri applications
//!
//! This crate wires a camera recording screen end to end: it asks the
//! platform for camera permission (prompting the user at most once),
//! configures a capture session in its fixed order (input, output, start),
//! publishes a live preview handle, and records video clips to uniquely
//! named files in the user's documents directory.
//!
//! # Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! clipcam = "0.1"
//! tauri = { version = "2.0", features = ["protocol-asset"] }
//! ```
//!
//! Then in your Tauri app:
//! ```rust,ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(clipcam::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! The frontend calls `initialize_recorder` once, polls `get_recorder_state`
//! to render the preview and the record button, and invokes
//! `start_recording` / `stop_recording` from user interaction.
pub mod authorization;
pub mod capture;
pub mod commands;
pub mod controller;
pub mod errors;
pub mod platform;
pub mod preview;
pub mod session;
pub mod storage;

// Testing utilities - offline stand-ins for the platform capabilities
pub mod testing;

// Re-exports for convenience
pub use authorization::{
    check_authorization, AuthorizationProvider, AuthorizationResult, AuthorizationStatus,
    PlatformAuthorization,
};
pub use capture::{CaptureBackend, FileOutput, RecordingDelegate, VideoDevice};
pub use controller::{Lifecycle, RecordingController, RecordingOutcome};
pub use errors::CameraError;
pub use platform::PlatformBackend;
pub use preview::{Preview, VideoGravity};
pub use session::CaptureSession;
pub use storage::{clip_path, DocumentStorage, PlatformStorage, CLIP_EXTENSION};

use tauri::{
    plugin::{Builder, TauriPlugin},
    Runtime,
};

/// Initialize the ClipCam plugin with all commands
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("clipcam")
        .invoke_handler(tauri::generate_handler![
            // Authorization commands
            commands::authorization::check_camera_authorization,
            commands::authorization::request_camera_authorization,
            // Recording screen commands
            commands::recording::initialize_recorder,
            commands::recording::start_recording,
            commands::recording::stop_recording,
            commands::recording::get_recorder_state,
        ])
        .build()
}

/// Initialize logging for the recording screen
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "clipcam=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
