//! Platform capture backend
//!
//! Binds the capture contract to the host: device enumeration goes through
//! nokhwa with the platform-appropriate API backend, and the file-output sink
//! manages the clip file's lifecycle and the one-shot completion callback.
//! Frame transport into the container stays with the embedding application.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use nokhwa::query;

use crate::capture::{CaptureBackend, FileOutput, RecordingDelegate, VideoDevice};
use crate::errors::CameraError;

/// The real capture backend for the current platform.
pub struct PlatformBackend;

impl CaptureBackend for PlatformBackend {
    fn default_video_device(&self) -> Option<VideoDevice> {
        default_video_device()
    }

    fn can_add_input(&self, _device: &VideoDevice) -> bool {
        true
    }

    fn can_add_output(&self) -> bool {
        true
    }

    fn make_file_output(&self) -> Arc<dyn FileOutput> {
        Arc::new(PlatformFileOutput::new())
    }

    fn start_running(&self) {
        log::info!("Capture pipeline started");
    }

    fn stop_running(&self) {
        log::info!("Capture pipeline stopped");
    }
}

/// First video device reported by the platform's native capture API.
pub fn default_video_device() -> Option<VideoDevice> {
    let backend = native_api_backend();

    match query(backend) {
        Ok(devices) => devices
            .into_iter()
            .next()
            .map(|info| VideoDevice::new(info.index().to_string(), info.human_name())),
        Err(e) => {
            log::warn!("Failed to query video devices: {}", e);
            None
        }
    }
}

fn native_api_backend() -> nokhwa::utils::ApiBackend {
    #[cfg(target_os = "linux")]
    {
        nokhwa::utils::ApiBackend::Video4Linux
    }

    #[cfg(target_os = "windows")]
    {
        nokhwa::utils::ApiBackend::MediaFoundation
    }

    #[cfg(target_os = "macos")]
    {
        nokhwa::utils::ApiBackend::AVFoundation
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        nokhwa::utils::ApiBackend::Auto
    }
}

struct ActiveClip {
    path: PathBuf,
    delegate: Arc<dyn RecordingDelegate>,
    created: Result<(), CameraError>,
}

/// File-output sink writing one clip at a time.
///
/// Creates the clip file when recording starts; on stop, finalizes it and
/// fires the completion delegate once, on a thread this sink owns.
pub struct PlatformFileOutput {
    active: Mutex<Option<ActiveClip>>,
}

impl PlatformFileOutput {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
        }
    }
}

impl Default for PlatformFileOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl FileOutput for PlatformFileOutput {
    fn start_recording(&self, path: &Path, delegate: Arc<dyn RecordingDelegate>) {
        let Ok(mut active) = self.active.lock() else {
            log::error!("File output lock poisoned, recording not started");
            return;
        };

        if active.is_some() {
            log::warn!("start_recording ignored: a clip is already being written");
            return;
        }

        let created = File::create(path).map(|_| ()).map_err(|e| {
            CameraError::RecordingFailed(format!("failed to create {}: {}", path.display(), e))
        });

        *active = Some(ActiveClip {
            path: path.to_path_buf(),
            delegate,
            created,
        });
    }

    fn stop_recording(&self) {
        let clip = {
            let Ok(mut active) = self.active.lock() else {
                log::error!("File output lock poisoned, recording not finalized");
                return;
            };
            active.take()
        };

        let Some(clip) = clip else {
            log::warn!("stop_recording ignored: no clip is being written");
            return;
        };

        // The completion callback runs on a thread owned by this sink
        std::thread::spawn(move || {
            let error = clip.created.err();
            clip.delegate.did_finish_recording(&clip.path, error);
        });
    }
}
