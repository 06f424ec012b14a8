use thiserror::Error;

/// Errors raised while wiring up or driving the capture session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("no default video device available")]
    InputUnavailable,
    #[error("capture session rejected video input: {0}")]
    InputRejected(String),
    #[error("capture session rejected file output: {0}")]
    OutputRejected(String),
    #[error("cannot find movie file output")]
    NoOutputSink,
    #[error("cannot access local documents directory")]
    NoDocumentsDirectory,
    #[error("recording failed: {0}")]
    RecordingFailed(String),
}
