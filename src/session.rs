//! Capture session wiring
//!
//! Owns zero-or-one video input and zero-or-one file-output sink over a
//! [`CaptureBackend`] and encodes the fixed setup order (input, output,
//! start) as one typed operation with full rollback on failure.

use std::sync::Arc;

use crate::capture::{CaptureBackend, FileOutput, VideoDevice};
use crate::errors::CameraError;

pub struct CaptureSession {
    backend: Arc<dyn CaptureBackend>,
    input: Option<VideoDevice>,
    output: Option<Arc<dyn FileOutput>>,
    running: bool,
}

impl CaptureSession {
    pub fn new(backend: Arc<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            input: None,
            output: None,
            running: false,
        }
    }

    /// Attach the default video device as the session's input.
    ///
    /// Chainable; a second call with an input already attached is a no-op.
    pub fn add_video_input(&mut self) -> Result<&mut Self, CameraError> {
        if self.input.is_some() {
            return Ok(self);
        }

        let device = self
            .backend
            .default_video_device()
            .ok_or(CameraError::InputUnavailable)?;

        if !self.backend.can_add_input(&device) {
            return Err(CameraError::InputRejected(device.name));
        }

        log::debug!("Attached video input: {}", device.name);
        self.input = Some(device);
        Ok(self)
    }

    /// Attach the single file-output sink.
    ///
    /// Idempotent: if a sink is already attached, the same handle is returned
    /// and nothing else happens.
    pub fn add_file_output(&mut self) -> Result<Arc<dyn FileOutput>, CameraError> {
        if let Some(output) = &self.output {
            return Ok(Arc::clone(output));
        }

        if !self.backend.can_add_output() {
            return Err(CameraError::OutputRejected(
                "movie file output".to_string(),
            ));
        }

        let output = self.backend.make_file_output();
        self.output = Some(Arc::clone(&output));
        Ok(output)
    }

    /// Start the capture pipeline.
    pub fn start_running(&mut self) {
        self.backend.start_running();
        self.running = true;
    }

    /// Run the full setup chain: input, output, start.
    ///
    /// A failure anywhere in the chain rolls the session back to its
    /// unconfigured state before the error is returned.
    pub fn configure(&mut self) -> Result<(), CameraError> {
        match self.try_configure() {
            Ok(()) => Ok(()),
            Err(e) => {
                self.teardown();
                Err(e)
            }
        }
    }

    fn try_configure(&mut self) -> Result<(), CameraError> {
        self.add_video_input()?;
        self.add_file_output()?;
        self.start_running();
        Ok(())
    }

    /// Detach input and output and stop the pipeline.
    pub fn teardown(&mut self) {
        self.input = None;
        self.output = None;
        if self.running {
            self.backend.stop_running();
            self.running = false;
        }
    }

    /// Locate the session's single file-output sink
    pub fn file_output(&self) -> Option<Arc<dyn FileOutput>> {
        self.output.clone()
    }

    pub fn input(&self) -> Option<&VideoDevice> {
        self.input.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_configure_attaches_input_output_and_starts() {
        let backend = Arc::new(MockBackend::new());
        let mut session = CaptureSession::new(backend.clone());

        session.configure().expect("setup should succeed");

        assert!(session.is_running());
        assert!(session.file_output().is_some());
        assert_eq!(session.input().unwrap().name, "Mock Camera");
    }

    #[test]
    fn test_add_file_output_is_idempotent() {
        struct CountingBackend {
            created: AtomicUsize,
        }

        impl CaptureBackend for CountingBackend {
            fn default_video_device(&self) -> Option<VideoDevice> {
                Some(VideoDevice::new("0", "Counting Camera"))
            }
            fn can_add_input(&self, _device: &VideoDevice) -> bool {
                true
            }
            fn can_add_output(&self) -> bool {
                true
            }
            fn make_file_output(&self) -> Arc<dyn FileOutput> {
                self.created.fetch_add(1, Ordering::SeqCst);
                Arc::new(crate::testing::MockFileOutput::new())
            }
            fn start_running(&self) {}
            fn stop_running(&self) {}
        }

        let backend = Arc::new(CountingBackend {
            created: AtomicUsize::new(0),
        });
        let mut session = CaptureSession::new(backend.clone());

        let first = session.add_file_output().unwrap();
        let second = session.add_file_output().unwrap();

        assert!(
            Arc::ptr_eq(&first, &second),
            "second attach must return the same sink handle"
        );
        assert_eq!(
            backend.created.load(Ordering::SeqCst),
            1,
            "exactly one sink is ever created"
        );
    }

    #[test]
    fn test_missing_device_fails_with_input_unavailable() {
        let backend = Arc::new(MockBackend::new().without_device());
        let mut session = CaptureSession::new(backend);

        assert_eq!(
            session.configure().unwrap_err(),
            CameraError::InputUnavailable
        );
    }

    #[test]
    fn test_rejected_input_fails_with_input_rejected() {
        let backend = Arc::new(MockBackend::new().rejecting_input());
        let mut session = CaptureSession::new(backend);

        assert!(matches!(
            session.configure().unwrap_err(),
            CameraError::InputRejected(_)
        ));
    }

    #[test]
    fn test_rejected_output_fails_with_output_rejected() {
        let backend = Arc::new(MockBackend::new().rejecting_output());
        let mut session = CaptureSession::new(backend);

        assert!(matches!(
            session.configure().unwrap_err(),
            CameraError::OutputRejected(_)
        ));
    }

    #[test]
    fn test_failed_setup_rolls_back_fully() {
        let backend = Arc::new(MockBackend::new().rejecting_output());
        let mut session = CaptureSession::new(backend);

        assert!(session.configure().is_err());

        assert!(session.input().is_none(), "input must be detached");
        assert!(session.file_output().is_none(), "output must be detached");
        assert!(!session.is_running());
    }
}
